use std::collections::HashMap;

use kitchen_core::{ArpOperation, Chef, ChefError, RawPacket};
use serde_json::{json, Value};

/// Summarizes ARP activity, one dumpling per ARP packet seen. Tracks the
/// IP -> MAC mapping seen so far so it can flag new or changed mappings.
pub struct ArpChef {
    ip_mac: HashMap<String, String>,
}

impl ArpChef {
    pub fn new() -> Self {
        Self {
            ip_mac: HashMap::new(),
        }
    }
}

impl Chef for ArpChef {
    fn name(&self) -> &str {
        "ArpChef"
    }

    fn on_packet(&mut self, packet: &RawPacket) -> Result<Option<Value>, ChefError> {
        let Some(arp) = &packet.arp else {
            return Ok(None);
        };

        let operation = match arp.operation {
            ArpOperation::Request => "request".to_string(),
            ArpOperation::Reply => "reply".to_string(),
            ArpOperation::Other(op) => op.to_string(),
        };

        let mut notes = None;
        if matches!(arp.operation, ArpOperation::Reply) {
            match self.ip_mac.get(&arp.src_ip) {
                None => notes = Some("source device is new"),
                Some(existing) if existing != &arp.src_hw => {
                    notes = Some("source device has new IP address")
                }
                _ => {}
            }
            self.ip_mac.insert(arp.src_ip.clone(), arp.src_hw.clone());
        }

        Ok(Some(json!({
            "operation": operation,
            "src_hw": arp.src_hw,
            "src_ip": arp.src_ip,
            "dst_hw": arp.dst_hw,
            "dst_ip": arp.dst_ip,
            "notes": notes,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_core::ArpInfo;

    fn reply(src_ip: &str, src_hw: &str) -> RawPacket {
        RawPacket {
            layers: vec!["ARP".to_string()],
            arp: Some(ArpInfo {
                operation: ArpOperation::Reply,
                src_hw: src_hw.to_string(),
                src_ip: src_ip.to_string(),
                dst_hw: "ff:ff:ff:ff:ff:ff".to_string(),
                dst_ip: "10.0.0.1".to_string(),
            }),
            dns_hostname: None,
            summary: "arp reply".to_string(),
        }
    }

    #[test]
    fn ignores_non_arp_packets() {
        let mut chef = ArpChef::new();
        let packet = RawPacket {
            layers: vec!["Ethernet".to_string()],
            arp: None,
            dns_hostname: None,
            summary: "eth".to_string(),
        };
        assert!(chef.on_packet(&packet).unwrap().is_none());
    }

    #[test]
    fn flags_new_device_then_new_ip_on_change() {
        let mut chef = ArpChef::new();

        let first = chef.on_packet(&reply("10.0.1.100", "aa:bb:cc:dd:ee:ff")).unwrap().unwrap();
        assert_eq!(first["notes"], "source device is new");

        let repeat = chef.on_packet(&reply("10.0.1.100", "aa:bb:cc:dd:ee:ff")).unwrap().unwrap();
        assert_eq!(repeat["notes"], Value::Null);

        let changed = chef.on_packet(&reply("10.0.1.100", "11:22:33:44:55:66")).unwrap().unwrap();
        assert_eq!(changed["notes"], "source device has new IP address");
    }
}
