use thiserror::Error;

/// Top-level error type for CreatorFlow.
#[derive(Debug, Error)]
pub enum CreatorFlowError {
    /// Error talking to the Telegram Bot API.
    #[error("telegram error: {0}")]
    Telegram(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Database/storage error.
    #[error("store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
