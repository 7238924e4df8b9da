use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use dumpling_protocol::{CloseReason, EaterIdentity, KitchenIdentity};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Bound on a single consumer's pending-frame queue. Exceeding it gets the
/// consumer disconnected with close code 4102 rather than stalling anyone
/// else — the bounded-queue-with-disconnect-on-overflow behavior the design
/// notes recommend in place of the original's unbounded queues.
pub const CONSUMER_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct ProducerRecord {
    pub identity: KitchenIdentity,
    pub peer_host: String,
    pub peer_port: u16,
}

pub struct ConsumerRecord {
    pub identity: EaterIdentity,
    pub peer_host: String,
    pub peer_port: u16,
    pub queue_tx: mpsc::Sender<Vec<u8>>,
    pub close_tx: mpsc::Sender<CloseReason>,
}

impl ConsumerRecord {
    fn snapshot(&self) -> (EaterIdentity, String, u16) {
        (self.identity.clone(), self.peer_host.clone(), self.peer_port)
    }
}

/// Shared hub state: the producer and consumer tables plus running
/// counters. Held behind `RwLock` even though a strictly single-threaded
/// event loop would need no lock at all, since Tokio's default runtime is
/// multi-threaded (see `DESIGN.md`).
pub struct HubState {
    producers: RwLock<HashMap<Uuid, ProducerRecord>>,
    consumers: RwLock<HashMap<Uuid, ConsumerRecord>>,
    dumplings_in: AtomicU64,
    dumplings_out: AtomicU64,
    started_at: Instant,
}

impl HubState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            producers: RwLock::new(HashMap::new()),
            consumers: RwLock::new(HashMap::new()),
            dumplings_in: AtomicU64::new(0),
            dumplings_out: AtomicU64::new(0),
            started_at: Instant::now(),
        })
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    pub fn dumplings_in(&self) -> u64 {
        self.dumplings_in.load(Ordering::SeqCst)
    }

    pub fn dumplings_out(&self) -> u64 {
        self.dumplings_out.load(Ordering::SeqCst)
    }

    pub fn record_dumpling_in(&self) {
        self.dumplings_in.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_dumpling_out(&self) {
        self.dumplings_out.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn register_producer(&self, id: Uuid, record: ProducerRecord) {
        self.producers.write().await.insert(id, record);
    }

    pub async fn unregister_producer(&self, id: Uuid) {
        self.producers.write().await.remove(&id);
    }

    pub async fn register_consumer(&self, id: Uuid, record: ConsumerRecord) {
        self.consumers.write().await.insert(id, record);
    }

    pub async fn unregister_consumer(&self, id: Uuid) {
        self.consumers.write().await.remove(&id);
    }

    pub async fn producer_snapshots(&self) -> Vec<ProducerRecord> {
        self.producers.read().await.values().cloned().collect()
    }

    pub async fn consumer_snapshots(&self) -> Vec<(EaterIdentity, String, u16)> {
        self.consumers
            .read()
            .await
            .values()
            .map(ConsumerRecord::snapshot)
            .collect()
    }

    pub async fn producer_count(&self) -> usize {
        self.producers.read().await.len()
    }

    pub async fn consumer_count(&self) -> usize {
        self.consumers.read().await.len()
    }

    /// Pushes `frame` onto every consumer queue that exists right now.
    /// A consumer whose queue is already full is disconnected (4102) rather
    /// than made to skip or block the push.
    pub async fn fan_out(&self, frame: &[u8]) {
        let consumers = self.consumers.read().await;
        for record in consumers.values() {
            if let Err(err) = record.queue_tx.try_send(frame.to_vec()) {
                if matches!(err, tokio::sync::mpsc::error::TrySendError::Full(_)) {
                    let _ = record.close_tx.try_send(CloseReason::eater_full());
                }
            }
        }
    }
}
