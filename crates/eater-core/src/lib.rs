//! A consumer client: connects to a hub's egress port, filters by chef
//! name, and invokes user callbacks per decoded dumpling.

mod client;
mod error;
mod handler;

pub use client::EaterClient;
pub use error::EaterError;
pub use handler::EaterHandler;
