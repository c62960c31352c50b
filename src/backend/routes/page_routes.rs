use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::pages::{render_canvas_page, report_client_error};
use crate::backend::server::state::AppState;
use crate::backend::session::handle_realtime_upgrade;

/// Configure page and realtime routes
///
/// - `GET /` - Client shell and page-load binding
/// - `GET /ws` - Realtime session (upgrade)
/// - `POST /error` - Client error report
pub fn configure_page_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(render_canvas_page))
        .route("/ws", get(handle_realtime_upgrade))
        .route("/error", post(report_client_error))
}
