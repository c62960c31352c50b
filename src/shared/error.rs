//! Wire-level errors
//!
//! Raised while encoding or decoding realtime frames, and while checking
//! values a client sent (a fingerprint, a coordinate) before the server acts
//! on them.
//!
//! ```rust
//! use pixelboard::shared::error::SharedError;
//!
//! let error = SharedError::validation("hash", "fingerprint too long");
//! assert!(error.to_string().contains("hash"));
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A server message could not be encoded
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// A client-supplied value was rejected
    #[error("Validation error in field '{field}': {message}")]
    ValidationError { field: String, message: String },

    /// A frame is not one of the known client messages
    #[error("Protocol error: {message}")]
    ProtocolError { message: String },
}

impl SharedError {
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError { message: message.into() }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError { message: message.into() }
    }

    /// True for errors caused by what the client sent
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, Self::SerializationError { .. })
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
