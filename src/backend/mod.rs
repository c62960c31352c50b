//! Backend Module
//!
//! This module contains all server-side code for the shared canvas. It
//! provides an Axum HTTP server with a WebSocket realtime protocol.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`canvas`** - Pixel grid, chunk reads and the single edit writer
//! - **`cooldown`** - Per-identity cooldown ledger
//! - **`identity`** - Page-load bindings, user store, handshake resolution
//! - **`session`** - Per-connection state machine and socket handler
//! - **`realtime`** - Fan-out of accepted edits
//! - **`persistence`** - Audit log, edit journal, PNG snapshots
//! - **`pages`** - Page-load, error-report and stats handlers
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── canvas/         - Grid, chunks, edit writer
//! ├── cooldown/       - Cooldown ledger
//! ├── identity/       - Bindings, users, resolver
//! ├── session/        - Edit sessions over WebSocket
//! ├── realtime/       - Update broadcasting
//! ├── persistence/    - Audit log and snapshots
//! ├── pages/          - HTTP page handlers
//! └── error/          - Error types
//! ```
//!
//! # Edit Flow
//!
//! 1. A session validates a `mouseDown` and submits it to the `EditQueue`
//! 2. The edit writer checks the cooldown ledger
//! 3. Under the grid write lock it sets the pixel and broadcasts `update`
//! 4. It records the edit and hands it to the journal
//! 5. The submitting session receives `timeoutUpdated`
//!
//! # Thread Safety
//!
//! - `Arc<RwLock<PixelGrid>>` for the raster; only the edit writer writes
//! - `broadcast::Sender` for accepted edits
//! - `std::sync::Mutex` maps for bindings and the cooldown ledger, never
//!   held across an `.await`
//!
//! # Example
//!
//! ```rust,no_run
//! use pixelboard::backend::server::create_app;
//! use pixelboard::shared::ServerConfig;
//! use std::net::SocketAddr;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::default()).await?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Pixel grid, chunks and edit writer
pub mod canvas;

/// Per-identity cooldown
pub mod cooldown;

/// Identity resolution
pub mod identity;

/// Realtime edit sessions
pub mod session;

/// Real-time update system
pub mod realtime;

/// Audit log and snapshots
pub mod persistence;

/// Page handlers
pub mod pages;

/// Backend error types
pub mod error;

pub use canvas::Canvas;
pub use error::BackendError;
pub use server::create_app;
