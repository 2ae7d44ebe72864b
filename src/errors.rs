use thiserror::Error;

/// Error type for configuration and persistence failures.
///
/// Generation itself never fails: exhausted searches fall back and soft
/// range misses are reported on the allocation.
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ReceiptError>;
