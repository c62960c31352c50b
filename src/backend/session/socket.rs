/**
 * Realtime Socket Handler
 *
 * Implements `GET /ws`: upgrades the connection, runs the handshake, then
 * multiplexes two streams until either side ends:
 *
 * - inbound text frames, decoded into `ClientMessage` and handed to the
 *   session
 * - accepted edits from the broadcast channel, forwarded as `update`
 *
 * The broadcast receiver is created before the handshake so that no edit
 * accepted after the client's first chunk read can be missed.
 *
 * A session whose receiver lags behind the broadcast buffer is closed; the
 * client reloads and fetches fresh chunks.
 */
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, Query, State,
    },
    response::Response,
};
use futures_util::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use serde::Deserialize;
use std::net::SocketAddr;
use tokio::sync::broadcast::error::RecvError;

use crate::backend::server::state::AppState;
use crate::backend::session::state::EditSession;
use crate::shared::{ClientMessage, ServerMessage};

/// Query string of `GET /ws`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RealtimeQuery {
    pub user: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl RealtimeQuery {
    /// `user=admin&userId=0`; only honoured from loopback addresses
    pub fn asserts_admin(&self) -> bool {
        self.user.as_deref() == Some("admin") && self.user_id.as_deref() == Some("0")
    }
}

/// Handle a realtime connection request (GET /ws)
///
/// # Arguments
///
/// * `State(state)` - Application state
/// * `ConnectInfo(peer)` - Remote address; must match a recent page load
/// * `Query(query)` - Optional admin assertion
/// * `ws` - WebSocket upgrade
pub async fn handle_realtime_upgrade(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(query): Query<RealtimeQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let asserts_admin = query.asserts_admin();
    tracing::debug!("[Session] Upgrade request from {} (admin asserted: {})", peer, asserts_admin);
    ws.on_upgrade(move |socket| run_session(socket, state, peer, asserts_admin))
}

type SocketSink = SplitSink<WebSocket, Message>;

async fn send_message(sink: &mut SocketSink, message: &ServerMessage) -> Result<(), axum::Error> {
    match message.to_json() {
        Ok(json) => sink.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::error!("[Session] Failed to encode {}: {}", message.tag(), e);
            Ok(())
        }
    }
}

/// Drive one realtime session to completion
pub async fn run_session(socket: WebSocket, state: AppState, peer: SocketAddr, asserts_admin: bool) {
    let _counted = state.sessions.enter();
    let (mut sink, mut stream) = socket.split();
    let mut updates = state.canvas.subscribe();
    let mut session = EditSession::new(peer, state.canvas.clone());

    for message in session.handshake(&state.identity, asserts_admin).await {
        if send_message(&mut sink, &message).await.is_err() {
            session.close();
            return;
        }
    }
    if !session.is_active() {
        let _ = sink.send(Message::Close(None)).await;
        return;
    }

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    let request = match ClientMessage::parse(text.as_str()) {
                        Ok(request) => request,
                        Err(e) => {
                            tracing::warn!("[Session] {} sent an undecodable frame: {}", session.id(), e);
                            continue;
                        }
                    };
                    if let Some(reply) = session.handle(request).await {
                        if send_message(&mut sink, &reply).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                // Pings are answered by axum; binary frames carry nothing we accept
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!("[Session] {} socket error: {}", session.id(), e);
                    break;
                }
            },
            update = updates.recv() => match update {
                Ok(update) => {
                    if send_message(&mut sink, &ServerMessage::Update(update)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "[Session] {} lagged {} updates behind, closing so the client resyncs",
                        session.id(),
                        skipped
                    );
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    session.close();
    tracing::info!("[Session] {} from {} disconnected", session.id(), peer);
}
