//! The broker/fanout engine: ingress from kitchens, egress to eaters, and
//! the periodic status synthesizer, all sharing one [`HubState`].

mod egress;
mod error;
mod ingress;
mod state;
mod status;

pub use egress::egress_router;
pub use error::{HubError, TransportBindError};
pub use ingress::ingress_router;
pub use state::{ConsumerRecord, HubState, ProducerRecord, CONSUMER_QUEUE_CAPACITY};
pub use status::run_status_synthesizer;
