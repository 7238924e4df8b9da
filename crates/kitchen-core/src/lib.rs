//! Chef-dispatch and interval-poke engine: the part of a kitchen process
//! that turns captured packets and timer ticks into dumplings.

mod chef;
mod kitchen;
mod packet_source;
mod uplink;

pub use chef::{Chef, ChefError};
pub use kitchen::{Kitchen, KitchenState};
pub use packet_source::{ArpInfo, ArpOperation, ChannelPacketSource, PacketSource, PacketSourceError, RawPacket};
pub use uplink::{run_uplink, UplinkError};
