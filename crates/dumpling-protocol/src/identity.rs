use serde::{Deserialize, Serialize};

/// First frame a kitchen sends on its uplink to the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenIdentity {
    pub kitchen_name: String,
    pub interface: String,
    pub filter: String,
    pub chefs: Vec<String>,
    pub poke_interval: Option<u64>,
}

/// First frame an eater sends on its downlink to the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EaterIdentity {
    pub eater_name: String,
}
