/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The loaded `ServerConfig`
 * - The running canvas (chunk store, edit queue, cooldown ledger, fan-out)
 * - The identity resolver and its page-load binding cache
 * - The user store pool
 * - The live session counter
 *
 * # Thread Safety
 *
 * Every field is a cheap, cloneable handle to shared state:
 * - `Arc<RwLock<PixelGrid>>` behind `Canvas` for the raster
 * - `mpsc::Sender` for the single edit writer
 * - `broadcast::Sender` for accepted edits
 *
 * # Example
 *
 * ```rust,no_run
 * use pixelboard::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) -> String {
 *     format!("{} sessions", state.sessions.active())
 * }
 * ```
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::backend::canvas::Canvas;
use crate::backend::identity::IdentityResolver;
use crate::backend::session::SessionCounter;
use crate::shared::ServerConfig;

/// Application state for Axum
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub canvas: Canvas,
    pub identity: IdentityResolver,
    pub db_pool: SqlitePool,
    pub sessions: SessionCounter,
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Canvas {
    fn from_ref(state: &AppState) -> Self {
        state.canvas.clone()
    }
}

impl FromRef<AppState> for IdentityResolver {
    fn from_ref(state: &AppState) -> Self {
        state.identity.clone()
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.db_pool.clone()
    }
}

impl FromRef<AppState> for SessionCounter {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
