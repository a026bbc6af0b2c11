//! Error types for donation-core

use thiserror::Error;

/// Core error types for the donation flow
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP-specific error
    #[error("Zip error: {0}")]
    Zip(String),

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The host stopped answering the flow
    #[error("Host disconnected: {0}")]
    HostDisconnected(String),

    /// A scripted host ran out of responses
    #[error("Script exhausted after {answered} responses")]
    ScriptExhausted { answered: usize },

    /// Generic error for other cases
    #[error("Other error: {0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
