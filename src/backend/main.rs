/**
 * pixelboard Server Entry Point
 *
 * Loads configuration, builds the application and serves it with peer
 * addresses attached to every request. On Ctrl-C the canvas is written to
 * `latest.png` before exiting.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use pixelboard::backend::persistence::SnapshotStore;
    use pixelboard::backend::routes::create_router;
    use pixelboard::backend::server::{build_state, load_config};
    use std::net::SocketAddr;

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    tracing::info!("[STARTUP] Server initialization started");

    let config = load_config()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let snapshots = SnapshotStore::new(&config.cache_dir);

    let state = build_state(config).await?;
    let grid = state.canvas.grid().clone();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[STARTUP] Listening on {}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("[SHUTDOWN] Saving canvas");
    if let Err(e) = snapshots.save_latest(&grid).await {
        tracing::error!("[SHUTDOWN] CRITICAL: canvas not saved: {}", e);
    }

    Ok(())
}

#[cfg(feature = "ssr")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[SHUTDOWN] Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("[SHUTDOWN] Signal received");
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin pixelboard-server --features ssr");
    std::process::exit(1);
}
