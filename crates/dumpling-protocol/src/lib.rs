//! Wire format and data model shared by the kitchen, hub, and eater roles.
//!
//! A dumpling is a single JSON-encodable event record. This crate owns the
//! typed [`Dumpling`] value, the lightweight `validate` used at hub ingress,
//! and the identity frames each role sends as the first message on its
//! stream.

mod close_codes;
mod dumpling;
mod identity;
mod status;

pub use close_codes::{CloseReason, CONN_CANCELLED, EATER_FULL};
pub use dumpling::{decode, validate, Driver, Dumpling, DumplingError};
pub use identity::{EaterIdentity, KitchenIdentity};
pub use status::{PeerSnapshot, SystemStatus, SYSTEM_STATUS_CHEF};
