mod arp_chef;
mod dns_lookup_chef;
mod packet_count_chef;

pub use arp_chef::ArpChef;
pub use dns_lookup_chef::DnsLookupChef;
pub use packet_count_chef::PacketCountChef;

use kitchen_core::Chef;

/// Compiled-in chef registry. Dynamic chef-module loading is an external
/// collaborator (the loader mechanism is whatever plugin ABI the host
/// provides); a systems-language kitchen ships its chefs compiled in
/// instead, per the design notes.
pub fn all_chef_names() -> Vec<&'static str> {
    vec!["PacketCountChef", "ArpChef", "DnsLookupChef"]
}

/// Constructs a fresh instance of the named compiled-in chef, or `None` if
/// no chef with that name is registered.
pub fn build_chef(name: &str) -> Option<Box<dyn Chef>> {
    match name {
        "PacketCountChef" => Some(Box::new(PacketCountChef::new())),
        "ArpChef" => Some(Box::new(ArpChef::new())),
        "DnsLookupChef" => Some(Box::new(DnsLookupChef::new())),
        _ => None,
    }
}
