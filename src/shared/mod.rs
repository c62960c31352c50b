//! Shared Module
//!
//! This module contains types that are shared between the server and any
//! client of the realtime protocol: the message set, wire-level errors and
//! the server configuration.
//!
//! # Overview
//!
//! The shared module is platform-agnostic and compiles without the `ssr`
//! feature. All message types are serde-serializable and travel as JSON text
//! frames over the realtime connection.

/// Realtime message set
pub mod protocol;

/// Shared error types
pub mod error;

/// Server configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use protocol::{ClientMessage, Color, HandshakeFailure, PixelUpdate, ServerMessage, PROTOCOL_VERSION};
pub use error::SharedError;
pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
