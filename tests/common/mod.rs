//! Common test utilities and helpers
//!
//! - Isolated server configuration on temporary directories
//! - A real listener on `127.0.0.1:0` for end-to-end tests
//! - WebSocket helpers speaking the JSON protocol

pub mod server;
pub mod socket;

pub use server::*;
pub use socket::*;
