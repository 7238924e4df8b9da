use std::sync::mpsc;
use thiserror::Error;

/// The ARP operation code, kept as an explicit enum rather than the raw
/// numeric op so chefs can match on it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArpOperation {
    Request,
    Reply,
    Other(u16),
}

/// ARP-layer fields a chef cares about, when present.
#[derive(Debug, Clone, PartialEq)]
pub struct ArpInfo {
    pub operation: ArpOperation,
    pub src_hw: String,
    pub src_ip: String,
    pub dst_hw: String,
    pub dst_ip: String,
}

/// A captured packet, already decoded enough for chefs to inspect.
///
/// Real packet capture (the sniffer library itself) is an explicit external
/// collaborator (see the root spec's scope notes); this type is the stable
/// shape a [`PacketSource`] hands to the kitchen, whatever backend produced
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPacket {
    /// Layer names from outermost to innermost, e.g. `["Ethernet", "IP",
    /// "TCP"]`. Used by layer-counting chefs.
    pub layers: Vec<String>,
    /// Present only for packets that carry an ARP layer.
    pub arp: Option<ArpInfo>,
    /// The queried hostname, present only for packets that carry a DNS
    /// query layer.
    pub dns_hostname: Option<String>,
    /// A short human-readable summary, used by the default chef handler.
    pub summary: String,
}

impl RawPacket {
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l == name)
    }
}

#[derive(Debug, Error)]
pub enum PacketSourceError {
    #[error("packet source closed")]
    Closed,
}

/// A source of captured packets. Real backends (libpnet, pcap bindings,
/// etc.) implement this; `ChannelPacketSource` is the in-tree stand-in fed
/// by an ordinary channel, used by demo mode and by tests.
pub trait PacketSource: Send {
    fn recv(&mut self) -> Result<RawPacket, PacketSourceError>;
}

/// Feeds packets pushed onto an `mpsc::Sender<RawPacket>` obtained from
/// [`ChannelPacketSource::channel`].
pub struct ChannelPacketSource {
    rx: mpsc::Receiver<RawPacket>,
}

impl ChannelPacketSource {
    pub fn channel() -> (mpsc::Sender<RawPacket>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl PacketSource for ChannelPacketSource {
    fn recv(&mut self) -> Result<RawPacket, PacketSourceError> {
        self.rx.recv().map_err(|_| PacketSourceError::Closed)
    }
}
