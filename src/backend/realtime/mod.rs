//! Real-time Update Module
//!
//! This module provides the fan-out of accepted edits to every connected
//! session.
//!
//! # Architecture
//!
//! - **`broadcast`** - Broadcast channel type and send helper
//!
//! The WebSocket handler that drains a session's receiver lives in
//! `backend::session::socket`.
//!
//! # Ordering
//!
//! The edit writer publishes an update while still holding the grid write
//! lock, and chunk reads take the read lock. A session therefore never reads
//! a chunk showing an edit whose update is not yet queued for it, and never
//! reads a pre-edit chunk after that update was queued.

/// Edit broadcasting utilities
pub mod broadcast;

pub use broadcast::{broadcast_update, PixelBroadcast};
