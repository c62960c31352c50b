/**
 * Backend Error Types
 *
 * Errors raised by HTTP handlers and while building the application. Each
 * converts into an HTTP response.
 *
 * Handlers fail on client input: an oversized or non-ASCII fingerprint, a
 * form body without its field. Startup fails on bad configuration, an
 * unreachable user store, a failed migration or a canvas that cannot be
 * allocated.
 *
 * Realtime sessions never surface these; they report handshake failures
 * through the `error` message instead.
 */

use crate::backend::canvas::CanvasError;
use crate::backend::persistence::PersistenceError;
use crate::shared::{ConfigError, SharedError};
use axum::http::StatusCode;
use thiserror::Error;

/// ```rust
/// use pixelboard::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "fingerprint too long");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request rejected by a handler with an explicit status
    #[error("Handler error: {message}")]
    HandlerError { status: StatusCode, message: String },

    /// Client input failed wire-level checks
    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// Grid allocation or edit writer failure
    #[error("Canvas error: {0}")]
    CanvasError(#[from] CanvasError),

    #[error("Store error: {0}")]
    StoreError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Persistence error: {0}")]
    PersistenceError(#[from] PersistenceError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BackendError {
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// `HandlerError` keeps its status; client-caused `SharedError`s are
    /// 400; everything else is 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(err) if err.is_client_fault() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message for the response body. Server-side failures are reported
    /// generically; the detail only goes to the log.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(err) if err.is_client_fault() => err.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}
