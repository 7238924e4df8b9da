use dumpling_protocol::Dumpling;
use tracing::{info, warn};

/// The three user hooks an eater can supply. This is the Rust equivalent of
/// the original's `on_connect`/`on_dumpling`/`on_connection_lost`
/// callables — a hook that isn't overridden falls back to a default that
/// merely logs. `on_dumpling` has no default: a handler that doesn't care
/// about dumplings has no reason to be an eater, so the compiler requires
/// it rather than failing at `run()` time.
pub trait EaterHandler: Send {
    /// Called once the identity frame has been sent. Awaited before the
    /// receive loop starts.
    async fn on_connect(&mut self, hub_uri: &str) {
        info!(hub_uri, "connected to hub");
    }

    /// Called for every dumpling that passed the chef filter. Awaited
    /// before the next frame is received.
    async fn on_dumpling(&mut self, dumpling: &Dumpling);

    /// Called when the connection to the hub is lost.
    async fn on_connection_lost(&mut self, reason: &str) {
        warn!(reason, "lost connection to hub");
    }
}
