use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use kitchen_core::{Chef, ChefError, RawPacket};
use serde_json::{json, Value};

struct LookupTally {
    count: u64,
    latest: u64,
}

/// Summarizes DNS lookups: one dumpling per lookup seen, plus a poke-interval
/// dumpling listing lookup counts and last-seen time per hostname.
pub struct DnsLookupChef {
    lookups_seen: BTreeMap<String, LookupTally>,
}

impl DnsLookupChef {
    pub fn new() -> Self {
        Self {
            lookups_seen: BTreeMap::new(),
        }
    }
}

impl Chef for DnsLookupChef {
    fn name(&self) -> &str {
        "DnsLookupChef"
    }

    fn on_packet(&mut self, packet: &RawPacket) -> Result<Option<Value>, ChefError> {
        let Some(hostname) = &packet.dns_hostname else {
            return Ok(None);
        };

        let now_millis = now_epoch_millis();
        self.lookups_seen
            .entry(hostname.clone())
            .and_modify(|tally| {
                tally.count += 1;
                tally.latest = now_millis;
            })
            .or_insert(LookupTally {
                count: 1,
                latest: now_millis,
            });

        Ok(Some(json!({
            "lookup": { "hostname": hostname, "when": now_millis },
        })))
    }

    fn on_interval(&mut self, _interval_secs: u64) -> Result<Option<Value>, ChefError> {
        let lookups_seen: BTreeMap<_, _> = self
            .lookups_seen
            .iter()
            .map(|(host, tally)| (host.clone(), json!({ "count": tally.count, "latest": tally.latest })))
            .collect();
        Ok(Some(json!({ "lookups_seen": lookups_seen })))
    }
}

fn now_epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dns_packet(hostname: &str) -> RawPacket {
        RawPacket {
            layers: vec!["DNS".to_string()],
            arp: None,
            dns_hostname: Some(hostname.to_string()),
            summary: "dns".to_string(),
        }
    }

    #[test]
    fn tallies_repeated_lookups() {
        let mut chef = DnsLookupChef::new();
        chef.on_packet(&dns_packet("example.com")).unwrap();
        chef.on_packet(&dns_packet("example.com")).unwrap();
        chef.on_packet(&dns_packet("other.com")).unwrap();

        let payload = chef.on_interval(5).unwrap().unwrap();
        assert_eq!(payload["lookups_seen"]["example.com"]["count"], 2);
        assert_eq!(payload["lookups_seen"]["other.com"]["count"], 1);
    }

    #[test]
    fn ignores_non_dns_packets() {
        let mut chef = DnsLookupChef::new();
        let packet = RawPacket {
            layers: vec!["Ethernet".to_string()],
            arp: None,
            dns_hostname: None,
            summary: "eth".to_string(),
        };
        assert!(chef.on_packet(&packet).unwrap().is_none());
    }
}
