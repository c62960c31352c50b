//! Persistence Module
//!
//! Everything that leaves memory: the daily audit log of accepted edits,
//! the journal task that writes edits to the audit log and the user store,
//! and PNG snapshots of the canvas.
//!
//! None of these sit on the broadcast path. Failures are logged as critical
//! and never reach a client; the in-memory grid stays authoritative.

use std::path::PathBuf;
use thiserror::Error;

pub mod audit;
pub mod journal;
pub mod snapshot;

pub use audit::{AuditEntry, AuditLog};
pub use journal::spawn_edit_journal;
pub use snapshot::{spawn_snapshot_task, SnapshotStore};

/// Errors raised while writing or reading persisted canvas data
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Snapshot buffer does not match {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
