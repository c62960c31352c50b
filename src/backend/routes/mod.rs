//! Route Configuration Module
//!
//! This module configures all HTTP routes for the canvas server.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation and route assembly
//! - **`page_routes`** - Page load, realtime socket and error reports
//! - **`api_routes`** - JSON API endpoints
//!
//! # Example
//!
//! ```rust,no_run
//! use pixelboard::backend::routes::create_router;
//! use pixelboard::backend::server::build_state;
//! use pixelboard::shared::ServerConfig;
//!
//! # async fn example() -> Result<(), pixelboard::backend::error::BackendError> {
//! let state = build_state(ServerConfig::default()).await?;
//! let router = create_router(state);
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// Page and realtime routes
pub mod page_routes;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
