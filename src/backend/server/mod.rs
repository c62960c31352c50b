//! Server Module
//!
//! This module contains the server-side code for initializing and
//! configuring the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Configuration loading and user store connection
//! - **`init`** - State construction, background tasks and app creation
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: defaults, TOML file, environment
//! 2. **State Creation**: user store, canvas, identity resolver
//! 3. **Background Tasks**: edit writer, journal, binding sweeper, snapshots
//! 4. **Router Creation**: page, realtime and API routes

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{connect_user_store, load_config};
pub use init::{build_state, create_app};
pub use state::AppState;
