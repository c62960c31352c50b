//! Backend Error Module
//!
//! This module defines error types specific to the canvas server.
//!
//! # Architecture
//!
//! - **`types`** - Error type definitions and constructors
//! - **`conversion`** - `IntoResponse` for HTTP handlers
//!
//! Domain errors (`IdentityError`, `CanvasError`, `PersistenceError`) live
//! next to their modules; `BackendError` is what handlers and startup code
//! return.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
