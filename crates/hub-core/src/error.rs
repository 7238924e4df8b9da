use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportBindError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum HubError {
    #[error(transparent)]
    Bind(#[from] TransportBindError),
}
