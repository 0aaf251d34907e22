//! Error types for the event scheduling service.

use thiserror::Error;

/// Errors that can occur in codec, validation and store operations.
#[derive(Error, Debug)]
pub enum EvschedError {
    #[error("Invalid XML: {0}")]
    MalformedEnvelope(String),

    #[error("Unknown operation")]
    UnknownOperation,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field} value: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("Invalid {field} format: {value}")]
    InvalidFormat { field: &'static str, value: String },

    #[error("Event not found")]
    NotFound,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl EvschedError {
    /// Whether the envelope endpoint reports this fault with a 500 status.
    ///
    /// A not-found or unknown-operation fault is a protocol-level outcome
    /// and goes out with a 200.
    pub fn is_server_error(&self) -> bool {
        !matches!(self, Self::NotFound | Self::UnknownOperation)
    }
}

impl From<rusqlite::Error> for EvschedError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// Result type alias for evsched operations.
pub type EvschedResult<T> = Result<T, EvschedError>;
