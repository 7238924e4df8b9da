use std::sync::Arc;
use std::time::Duration;

use dumpling_protocol::{Dumpling, Driver, PeerSnapshot, SystemStatus, SYSTEM_STATUS_CHEF};
use tracing::{debug, error};

use crate::state::HubState;

/// Every `status_freq`, composes the status payload and pushes it onto
/// every consumer queue. Runs until the process exits; does not return.
pub async fn run_status_synthesizer(state: Arc<HubState>, status_freq: Duration) {
    let mut ticker = tokio::time::interval(status_freq);
    loop {
        ticker.tick().await;

        let kitchens: Vec<_> = state
            .producer_snapshots()
            .await
            .into_iter()
            .map(|p| PeerSnapshot {
                identity: p.identity,
                peer_host: p.peer_host,
                peer_port: p.peer_port,
            })
            .collect();

        let eaters: Vec<_> = state
            .consumer_snapshots()
            .await
            .into_iter()
            .map(|(identity, peer_host, peer_port)| PeerSnapshot {
                identity,
                peer_host,
                peer_port,
            })
            .collect();

        let status = SystemStatus {
            total_dumplings_in: state.dumplings_in(),
            total_dumplings_out: state.dumplings_out(),
            server_uptime: state.uptime_secs(),
            dumpling_kitchen_count: kitchens.len(),
            dumpling_eater_count: eaters.len(),
            dumpling_kitchens: kitchens,
            dumpling_eaters: eaters,
        };

        let payload = match serde_json::to_value(&status) {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "failed to serialize status payload");
                continue;
            }
        };

        let eater_count = status.dumpling_eater_count;
        let dumpling = Dumpling::new(SYSTEM_STATUS_CHEF, None, Driver::Interval, payload);
        match dumpling.encode() {
            Ok(bytes) => {
                debug!(eaters = eater_count, "broadcasting status dumpling");
                state.fan_out(&bytes).await;
            }
            Err(e) => error!(error = %e, "failed to encode status dumpling"),
        }
    }
}
