use serde_json::Value;
use thiserror::Error;

use crate::packet_source::RawPacket;

#[derive(Debug, Error)]
pub enum ChefError {
    #[error("{0}")]
    Failed(String),
}

/// A dumpling producer. A kitchen holds a heterogeneous, registration-order
/// set of chefs and invokes each one's handlers in sequence on whichever
/// thread (capture or poke) is driving at the time.
///
/// A chef owns its own mutable state (e.g. per-host counters); it is the
/// kitchen's job, not the chef's, to serialize concurrent access.
pub trait Chef: Send {
    /// Typically the type name, used by consumers for filtering.
    fn name(&self) -> &str;

    /// Set to `false` by chefs that are abstract bases and should never be
    /// registered directly with a kitchen.
    fn assignable_to_kitchen(&self) -> bool {
        true
    }

    /// Called for every captured packet. `Ok(None)` means "no dumpling this
    /// time" — the sentinel the original calls returning `None`.
    fn on_packet(&mut self, packet: &RawPacket) -> Result<Option<Value>, ChefError>;

    /// Called every `interval` seconds by the poke worker. The default does
    /// nothing, matching the base class's no-op implementation.
    fn on_interval(&mut self, _interval_secs: u64) -> Result<Option<Value>, ChefError> {
        Ok(None)
    }
}
