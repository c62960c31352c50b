/**
 * Server Initialization
 *
 * This module builds the application state, starts the background tasks
 * and configures the router.
 *
 * # Initialization Process
 *
 * 1. Connect the user store and run migrations
 * 2. Restore the canvas from `latest.png`, or start blank
 * 3. Start the edit writer and the edit journal
 * 4. Start the binding and cooldown sweepers and the snapshot task
 * 5. Create the router
 *
 * # Restoration
 *
 * A missing snapshot is normal on first start. An unreadable one is logged
 * and the canvas starts blank rather than refusing to serve.
 */

use axum::Router;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::backend::canvas::{Canvas, CanvasSettings, PixelGrid};
use crate::backend::cooldown::spawn_ledger_sweeper;
use crate::backend::error::BackendError;
use crate::backend::identity::{spawn_binding_sweeper, BindingCache, IdentityResolver};
use crate::backend::persistence::{spawn_edit_journal, spawn_snapshot_task, AuditLog, SnapshotStore};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::connect_user_store;
use crate::backend::server::state::AppState;
use crate::backend::session::SessionCounter;
use crate::shared::ServerConfig;

/// Build the shared application state and start its background tasks
pub async fn build_state(config: ServerConfig) -> Result<AppState, BackendError> {
    config.validate()?;
    tracing::info!(
        "[Server] Initializing {}x{} canvas (chunk size {})",
        config.width,
        config.height,
        config.chunk_size
    );

    let db_pool = connect_user_store(&config.database_url).await?;

    let snapshots = SnapshotStore::new(&config.cache_dir);
    let grid = match snapshots.load_latest(config.width, config.height).await {
        Ok(Some(grid)) => grid,
        Ok(None) => {
            tracing::info!("[Server] No snapshot found, starting with a blank canvas");
            blank_grid(&config)?
        }
        Err(e) => {
            tracing::error!("[Server] CRITICAL: could not restore canvas, starting blank: {}", e);
            blank_grid(&config)?
        }
    };

    let (journal_tx, journal_rx) = mpsc::channel(config.journal_capacity);
    let canvas = Canvas::start(grid, CanvasSettings::from_config(&config), Some(journal_tx)).await;
    spawn_edit_journal(journal_rx, AuditLog::new(&config.audit_dir), db_pool.clone());

    let bindings = BindingCache::new(config.binding_ttl());
    spawn_binding_sweeper(bindings.clone(), config.binding_sweep_interval());
    spawn_ledger_sweeper(canvas.ledger.clone(), config.binding_sweep_interval());

    spawn_snapshot_task(
        snapshots,
        canvas.grid().clone(),
        config.snapshot_interval(),
        config.backup_interval(),
    );

    Ok(AppState {
        identity: IdentityResolver::new(db_pool.clone(), bindings),
        config: Arc::new(config),
        canvas,
        db_pool,
        sessions: SessionCounter::new(),
    })
}

fn blank_grid(config: &ServerConfig) -> Result<PixelGrid, BackendError> {
    Ok(PixelGrid::new(config.width, config.height)?)
}

/// Create and configure the Axum application
///
/// # Example
///
/// ```rust,no_run
/// use pixelboard::backend::server::create_app;
/// use pixelboard::shared::ServerConfig;
///
/// # async fn example() -> Result<(), pixelboard::backend::error::BackendError> {
/// let app = create_app(ServerConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, BackendError> {
    let state = build_state(config).await?;
    let app = create_router(state);
    tracing::info!("[Server] Router configured");
    Ok(app)
}
