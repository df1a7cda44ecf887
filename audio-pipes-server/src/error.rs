use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Hub task is not running")]
    HubUnavailable,
}

impl ServerError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        ServerError::InvalidConfig(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
