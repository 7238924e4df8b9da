use thiserror::Error;

#[derive(Debug, Error)]
pub enum EaterError {
    #[error("could not connect to hub: {0}")]
    Connect(String),
    #[error("websocket error: {0}")]
    Ws(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}
