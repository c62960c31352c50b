/**
 * API Route Handlers
 *
 * JSON endpoints outside the realtime protocol.
 *
 * # Routes
 *
 * - `GET /api/stats` - Canvas width, height, chunk size and live sessions
 */

use axum::{routing::get, Router};

use crate::backend::pages::get_canvas_stats;
use crate::backend::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/stats", get(get_canvas_stats))
}
