use std::collections::BTreeMap;

use kitchen_core::{Chef, ChefError, RawPacket};
use serde_json::{json, Value};

/// Counts packets seen so far per network layer and sends one dumpling per
/// poke interval listing all layer counts.
pub struct PacketCountChef {
    packet_counts: BTreeMap<String, u64>,
}

impl PacketCountChef {
    pub fn new() -> Self {
        Self {
            packet_counts: BTreeMap::new(),
        }
    }
}

impl Chef for PacketCountChef {
    fn name(&self) -> &str {
        "PacketCountChef"
    }

    fn on_packet(&mut self, packet: &RawPacket) -> Result<Option<Value>, ChefError> {
        for layer in &packet.layers {
            *self.packet_counts.entry(layer.clone()).or_insert(0) += 1;
        }
        Ok(None)
    }

    fn on_interval(&mut self, _interval_secs: u64) -> Result<Option<Value>, ChefError> {
        Ok(Some(json!({ "packet_counts": self.packet_counts })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(layers: &[&str]) -> RawPacket {
        RawPacket {
            layers: layers.iter().map(|l| l.to_string()).collect(),
            arp: None,
            dns_hostname: None,
            summary: "test".to_string(),
        }
    }

    #[test]
    fn tallies_layers_and_reports_on_poke() {
        let mut chef = PacketCountChef::new();
        chef.on_packet(&packet(&["Ethernet", "IP", "TCP"])).unwrap();
        chef.on_packet(&packet(&["Ethernet", "IP", "UDP"])).unwrap();

        assert!(chef.on_packet(&packet(&["Ethernet"])).unwrap().is_none());

        let payload = chef.on_interval(5).unwrap().unwrap();
        assert_eq!(payload["packet_counts"]["Ethernet"], 3);
        assert_eq!(payload["packet_counts"]["IP"], 2);
        assert_eq!(payload["packet_counts"]["TCP"], 1);
    }
}
