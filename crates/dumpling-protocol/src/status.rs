use serde::{Deserialize, Serialize};

use crate::identity::{EaterIdentity, KitchenIdentity};

/// `chef_name` the hub uses for its own synthesized status dumplings.
pub const SYSTEM_STATUS_CHEF: &str = "SystemStatusChef";

/// An identity frame plus the peer address the hub observed it from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerSnapshot<Identity> {
    #[serde(flatten)]
    pub identity: Identity,
    pub peer_host: String,
    pub peer_port: u16,
}

/// Payload of the hub's periodic status dumpling, as described in the wire
/// format: uptime, running totals, and a snapshot of every connected peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub total_dumplings_in: u64,
    pub total_dumplings_out: u64,
    pub server_uptime: f64,
    pub dumpling_kitchen_count: usize,
    pub dumpling_eater_count: usize,
    pub dumpling_kitchens: Vec<PeerSnapshot<KitchenIdentity>>,
    pub dumpling_eaters: Vec<PeerSnapshot<EaterIdentity>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_with_empty_peers() {
        let status = SystemStatus {
            total_dumplings_in: 3,
            total_dumplings_out: 9,
            server_uptime: 1.5,
            dumpling_kitchen_count: 0,
            dumpling_eater_count: 0,
            dumpling_kitchens: vec![],
            dumpling_eaters: vec![],
        };
        let bytes = serde_json::to_vec(&status).unwrap();
        let back: SystemStatus = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status, back);
    }
}
