/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Page routes (page load, realtime socket, error reports)
 * 2. API routes (stats)
 * 3. Static files under `/static`
 * 4. Fallback handler (404)
 */

use axum::{http::StatusCode, Router};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::page_routes::configure_page_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing the canvas and services
///
/// # Route Details
///
/// - `GET /` - Client shell; binds `?hash=` to the caller's address
/// - `GET /ws` - Realtime session
/// - `POST /error` - Client error report
/// - `GET /api/stats` - Canvas dimensions and live sessions
/// - `/static/*` - Files from the configured static directory
///
/// The router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`; page loads and
/// handshakes are keyed by the peer address.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_page_routes(Router::new());
    let router = configure_api_routes(router);

    let router = router.nest_service("/static", ServeDir::new(&app_state.config.static_dir));

    let router = router.fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") });

    router
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}
