use thiserror::Error;

/// Errors surfaced by the viewer core and its adapters.
#[derive(Error, Debug)]
pub enum VizError {
    #[error("Request to {path} failed: {message}")]
    Transport { path: String, message: String },

    /// Non-2xx reply; `body` keeps whatever the server sent with it.
    #[error("Request to {path} returned status {status}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Wire(#[from] common::error::WireError),

    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },
}

impl VizError {
    pub fn transport(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        VizError::Transport {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience type alias for Results using VizError
pub type VizResult<T> = Result<T, VizError>;
