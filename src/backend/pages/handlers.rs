/**
 * Page Handlers
 *
 * - `GET /` renders the client shell and, when the request carries a
 *   fingerprint, binds it to the caller's address for the realtime
 *   handshake that follows.
 * - `POST /error` accepts a client-observed error for server-side logging.
 * - `GET /api/stats` reports canvas dimensions and live sessions.
 */
use axum::{
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::backend::error::BackendError;
use crate::backend::identity::IdentityResolver;
use crate::backend::pages::shell::render_shell;
use crate::backend::server::state::AppState;
use crate::shared::SharedError;

/// Header accepted in place of the `hash` query parameter
pub const FINGERPRINT_HEADER: &str = "x-fingerprint";

/// Longest fingerprint accepted on page load
pub const MAX_FINGERPRINT_LEN: usize = 128;

/// Longest client error message that is logged verbatim
pub const MAX_REPORT_LEN: usize = 1024;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub hash: Option<String>,
}

/// Extract the fingerprint from `?hash=` or the `X-Fingerprint` header
fn fingerprint_from(query: PageQuery, headers: &HeaderMap) -> Option<String> {
    query
        .hash
        .filter(|hash| !hash.is_empty())
        .or_else(|| {
            headers
                .get(FINGERPRINT_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
}

fn validate_fingerprint(fingerprint: &str) -> Result<(), SharedError> {
    if fingerprint.len() > MAX_FINGERPRINT_LEN {
        return Err(SharedError::validation(
            "hash",
            format!("fingerprint longer than {} bytes", MAX_FINGERPRINT_LEN),
        ));
    }
    if !fingerprint.chars().all(|c| c.is_ascii_graphic()) {
        return Err(SharedError::validation("hash", "fingerprint must be printable ASCII"));
    }
    Ok(())
}

/// Handle a page load (GET /)
///
/// # Errors
///
/// Returns `400 Bad Request` for an oversized or non-printable fingerprint.
pub async fn render_canvas_page(
    State(identity): State<IdentityResolver>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Html<String>, BackendError> {
    let fingerprint = fingerprint_from(query, &headers);
    let bound = match fingerprint {
        Some(fingerprint) => {
            validate_fingerprint(&fingerprint)?;
            tracing::debug!("[Pages] Binding {} for page load", peer.ip());
            identity.bind_page_load(peer.ip(), fingerprint);
            true
        }
        None => false,
    };
    Ok(Html(render_shell(bound)))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientErrorReport {
    pub error: String,
}

fn truncate_report(message: &str) -> &str {
    if message.len() <= MAX_REPORT_LEN {
        return message;
    }
    let mut end = MAX_REPORT_LEN;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

/// Handle a client error report (POST /error)
pub async fn report_client_error(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Form(report): Form<ClientErrorReport>,
) -> StatusCode {
    tracing::warn!("[Client] {} reported: {}", peer.ip(), truncate_report(&report.error));
    StatusCode::NO_CONTENT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasStats {
    pub width: u32,
    pub height: u32,
    pub chunk_size: u32,
    pub sessions: usize,
}

/// Handle a stats request (GET /api/stats)
pub async fn get_canvas_stats(State(state): State<AppState>) -> Json<CanvasStats> {
    let chunks = &state.canvas.chunks;
    Json(CanvasStats {
        width: chunks.width(),
        height: chunks.height(),
        chunk_size: chunks.chunk_size(),
        sessions: state.sessions.active(),
    })
}
