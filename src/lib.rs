//! pixelboard - Shared Canvas Server
//!
//! pixelboard is a multi-user pixel canvas: every connected client sees the
//! same raster and may recolor one pixel per cooldown window. Edits are
//! streamed to all clients over WebSockets.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and clients
//!   - Realtime protocol messages (`ClientMessage`, `ServerMessage`)
//!   - Server configuration
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and WebSocket sessions
//!   - Canvas state, cooldowns and identity resolution
//!   - SQLite user store, audit log and PNG snapshots
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend module and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use pixelboard::backend::server::{create_app, load_config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config()?;
//! let app = create_app(config).await?;
//! // Serve with `into_make_service_with_connect_info::<SocketAddr>()`
//! # Ok(())
//! # }
//! ```
//!
//! # Realtime Protocol
//!
//! JSON text frames shaped `{"type": <tag>, "data": <payload>}`. See
//! `shared::protocol` for the full message table.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
