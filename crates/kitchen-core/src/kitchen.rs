use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use dumpling_protocol::{Driver, Dumpling};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::chef::Chef;
use crate::packet_source::{PacketSource, RawPacket};

const CREATED: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

/// `Created -> Running -> Stopped`. There is no pause/resume; stopping
/// happens when the capture thread's source is exhausted or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KitchenState {
    Created,
    Running,
    Stopped,
}

/// Runs the sniffer callback and the interval poker, dispatching to every
/// registered chef and turning non-sentinel returns into encoded dumplings
/// on an outbound queue.
///
/// Chef calls are serialized under one mutex — the "simpler design" the
/// concurrency model explicitly allows — so a chef never needs to worry
/// about being invoked from the capture and poke threads at once.
pub struct Kitchen {
    name: String,
    chefs: Arc<Mutex<Vec<Box<dyn Chef>>>>,
    outbound_tx: mpsc::Sender<Vec<u8>>,
    state: Arc<AtomicU8>,
}

impl Kitchen {
    pub fn new(name: impl Into<String>, outbound_tx: mpsc::Sender<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            chefs: Arc::new(Mutex::new(Vec::new())),
            outbound_tx,
            state: Arc::new(AtomicU8::new(CREATED)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> KitchenState {
        match self.state.load(Ordering::SeqCst) {
            RUNNING => KitchenState::Running,
            STOPPED => KitchenState::Stopped,
            _ => KitchenState::Created,
        }
    }

    /// Registers a chef. Registration order is preserved and is the order
    /// of dispatch for every subsequent packet or poke.
    pub fn register_chef(&self, chef: Box<dyn Chef>) {
        if !chef.assignable_to_kitchen() {
            warn!(chef = chef.name(), "chef is not assignable to a kitchen; skipping");
            return;
        }
        debug!(kitchen = %self.name, chef = chef.name(), "registered chef");
        self.chefs.lock().expect("chef registry lock poisoned").push(chef);
    }

    pub fn chef_names(&self) -> Vec<String> {
        self.chefs
            .lock()
            .expect("chef registry lock poisoned")
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Spawns the capture thread. Runs until `source.recv()` returns an
    /// error (source closed), at which point the kitchen transitions to
    /// `Stopped`.
    pub fn spawn_capture<S: PacketSource + 'static>(&self, mut source: S) -> thread::JoinHandle<()> {
        self.state.store(RUNNING, Ordering::SeqCst);
        let chefs = Arc::clone(&self.chefs);
        let outbound_tx = self.outbound_tx.clone();
        let kitchen_name = self.name.clone();
        let state = Arc::clone(&self.state);

        thread::spawn(move || {
            loop {
                let packet = match source.recv() {
                    Ok(packet) => packet,
                    Err(_) => break,
                };
                dispatch_packet(&chefs, &kitchen_name, &outbound_tx, &packet);
            }
            state.store(STOPPED, Ordering::SeqCst);
        })
    }

    /// Spawns the interval poker thread. `None` disables poking entirely,
    /// matching `poke_interval = None` in the kitchen identity frame.
    pub fn spawn_poke(&self, poke_interval: Option<Duration>) -> Option<thread::JoinHandle<()>> {
        let interval = poke_interval?;
        let chefs = Arc::clone(&self.chefs);
        let outbound_tx = self.outbound_tx.clone();
        let kitchen_name = self.name.clone();
        let interval_secs = interval.as_secs().max(1);

        Some(thread::spawn(move || loop {
            thread::sleep(interval);
            debug!(kitchen = %kitchen_name, "poking chefs");
            poke_chefs(&chefs, &kitchen_name, &outbound_tx, interval_secs);
        }))
    }
}

fn dispatch_packet(
    chefs: &Arc<Mutex<Vec<Box<dyn Chef>>>>,
    kitchen_name: &str,
    outbound_tx: &mpsc::Sender<Vec<u8>>,
    packet: &RawPacket,
) {
    let mut chefs = chefs.lock().expect("chef registry lock poisoned");
    for chef in chefs.iter_mut() {
        let chef_name = chef.name().to_string();
        let result = catch_unwind(AssertUnwindSafe(|| chef.on_packet(packet)));

        let payload = match result {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => {
                error!(kitchen = kitchen_name, chef = %chef_name, error = %e, "packet handler failed");
                continue;
            }
            Err(_) => {
                error!(kitchen = kitchen_name, chef = %chef_name, "packet handler panicked");
                continue;
            }
        };

        if let Some(payload) = payload {
            emit(kitchen_name, &chef_name, Driver::Packet, payload, outbound_tx);
        }
    }
}

fn poke_chefs(
    chefs: &Arc<Mutex<Vec<Box<dyn Chef>>>>,
    kitchen_name: &str,
    outbound_tx: &mpsc::Sender<Vec<u8>>,
    interval_secs: u64,
) {
    let mut chefs = chefs.lock().expect("chef registry lock poisoned");
    for chef in chefs.iter_mut() {
        let chef_name = chef.name().to_string();
        let result = catch_unwind(AssertUnwindSafe(|| chef.on_interval(interval_secs)));

        let payload = match result {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => {
                error!(kitchen = kitchen_name, chef = %chef_name, error = %e, "interval handler failed");
                continue;
            }
            Err(_) => {
                error!(kitchen = kitchen_name, chef = %chef_name, "interval handler panicked");
                continue;
            }
        };

        if let Some(payload) = payload {
            emit(kitchen_name, &chef_name, Driver::Interval, payload, outbound_tx);
        }
    }
}

fn emit(
    kitchen_name: &str,
    chef_name: &str,
    driver: Driver,
    payload: serde_json::Value,
    outbound_tx: &mpsc::Sender<Vec<u8>>,
) {
    let dumpling = Dumpling::new(chef_name, Some(kitchen_name.to_string()), driver, payload);
    let encoded = match dumpling.encode() {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(kitchen = kitchen_name, chef = chef_name, error = %e, "dropping dumpling with invalid payload");
            return;
        }
    };

    if let Err(e) = outbound_tx.try_send(encoded) {
        warn!(kitchen = kitchen_name, chef = chef_name, error = %e, "outbound queue full; dropping dumpling");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chef::ChefError;
    use crate::packet_source::ChannelPacketSource;
    use serde_json::json;

    struct AlwaysFails;
    impl Chef for AlwaysFails {
        fn name(&self) -> &str {
            "AlwaysFails"
        }
        fn on_packet(&mut self, _packet: &RawPacket) -> Result<Option<serde_json::Value>, ChefError> {
            Err(ChefError::Failed("boom".to_string()))
        }
    }

    struct CountsPackets {
        count: u32,
    }
    impl Chef for CountsPackets {
        fn name(&self) -> &str {
            "CountsPackets"
        }
        fn on_packet(&mut self, _packet: &RawPacket) -> Result<Option<serde_json::Value>, ChefError> {
            self.count += 1;
            Ok(Some(json!({"ok": true, "count": self.count})))
        }
    }

    fn raw_packet() -> RawPacket {
        RawPacket {
            layers: vec!["Ethernet".to_string()],
            arp: None,
            dns_hostname: None,
            summary: "eth".to_string(),
        }
    }

    #[tokio::test]
    async fn a_failing_chef_does_not_block_a_later_chef() {
        let (outbound_tx, mut outbound_rx) = mpsc::channel(8);
        let kitchen = Kitchen::new("K", outbound_tx);
        kitchen.register_chef(Box::new(AlwaysFails));
        kitchen.register_chef(Box::new(CountsPackets { count: 0 }));

        let (tx, source) = ChannelPacketSource::channel();
        tx.send(raw_packet()).unwrap();
        drop(tx);

        let handle = kitchen.spawn_capture(source);
        handle.join().unwrap();

        let encoded = outbound_rx.recv().await.expect("one dumpling from CountsPackets");
        let dumpling = dumpling_protocol::decode(&encoded).unwrap();
        assert_eq!(dumpling.chef_name(), "CountsPackets");
        assert!(outbound_rx.try_recv().is_err());
    }

    #[test]
    fn register_chef_rejects_non_assignable_chefs() {
        struct Abstract;
        impl Chef for Abstract {
            fn name(&self) -> &str {
                "Abstract"
            }
            fn assignable_to_kitchen(&self) -> bool {
                false
            }
            fn on_packet(&mut self, _packet: &RawPacket) -> Result<Option<serde_json::Value>, ChefError> {
                Ok(None)
            }
        }

        let (outbound_tx, _rx) = mpsc::channel(1);
        let kitchen = Kitchen::new("K", outbound_tx);
        kitchen.register_chef(Box::new(Abstract));
        assert!(kitchen.chef_names().is_empty());
    }
}
