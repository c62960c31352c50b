/**
 * Edit Session
 *
 * Per-connection state machine: `Handshaking -> Active -> Closed`.
 *
 * The session owns no socket. It consumes decoded `ClientMessage`s and
 * produces the `ServerMessage`s to send back to its own client; broadcast
 * updates from other sessions are forwarded by the socket task directly.
 *
 * Invalid requests and cooldown rejections are logged and dropped with no
 * reply.
 */
use std::net::SocketAddr;
use uuid::Uuid;

use crate::backend::canvas::{Canvas, EditOutcome, EditRequest};
use crate::backend::identity::{Identity, IdentityError, IdentityResolver, UserId};
use crate::shared::{ClientMessage, Color, ServerMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Handshaking,
    Active(Identity),
    Closed,
}

#[derive(Debug)]
pub struct EditSession {
    id: Uuid,
    peer: SocketAddr,
    canvas: Canvas,
    state: SessionState,
}

impl EditSession {
    pub fn new(peer: SocketAddr, canvas: Canvas) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer,
            canvas,
            state: SessionState::Handshaking,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Active(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Resolve this connection's identity.
    ///
    /// Returns the messages to send: `postStats` and `timeoutUpdated` on
    /// success, a single `error` on failure (the session is then closed).
    pub async fn handshake(&mut self, resolver: &IdentityResolver, asserts_admin: bool) -> Vec<ServerMessage> {
        if self.state != SessionState::Handshaking {
            tracing::warn!("[Session] {} handshake attempted in state {:?}", self.id, self.state);
            return Vec::new();
        }
        let result = resolver.handshake(self.peer.ip(), asserts_admin).await;
        self.complete_handshake(result)
    }

    fn complete_handshake(&mut self, result: Result<Identity, IdentityError>) -> Vec<ServerMessage> {
        match result {
            Ok(identity) => {
                self.canvas.ledger.seed(&identity);
                let expiry = self.canvas.ledger.time_remaining(identity.user_id);
                tracing::info!(
                    "[Session] {} from {} active as user {}",
                    self.id,
                    self.peer,
                    identity.user_id
                );
                let chunks = &self.canvas.chunks;
                let stats = ServerMessage::stats(chunks.width(), chunks.height(), chunks.chunk_size());
                self.state = SessionState::Active(identity);
                vec![stats, ServerMessage::timeout_updated(expiry)]
            }
            Err(e) => {
                match &e {
                    IdentityError::MissingBinding(_) => {
                        tracing::info!("[Session] {} rejected: {}", self.id, e)
                    }
                    _ => tracing::error!("[Session] {} rejected: {}", self.id, e),
                }
                self.state = SessionState::Closed;
                vec![ServerMessage::Error(e.failure())]
            }
        }
    }

    /// Handle one inbound request; `None` means nothing is sent back
    pub async fn handle(&mut self, message: ClientMessage) -> Option<ServerMessage> {
        let user = match &self.state {
            SessionState::Active(identity) => identity.user_id,
            state => {
                tracing::warn!("[Session] {} refused {:?} in state {:?}", self.id, message, state);
                return None;
            }
        };

        match message {
            ClientMessage::GetChunk { chunk_x, chunk_y } => self.handle_chunk_request(chunk_x, chunk_y).await,
            ClientMessage::MouseDown { x, y, color } => {
                let request = self.validate_edit(user, x, y, color)?;
                self.submit_edit(request).await
            }
            ClientMessage::RequestTimeout => {
                Some(ServerMessage::timeout_updated(self.canvas.ledger.time_remaining(user)))
            }
        }
    }

    async fn handle_chunk_request(&self, chunk_x: i64, chunk_y: i64) -> Option<ServerMessage> {
        let chunks = &self.canvas.chunks;
        if !chunks.contains_chunk(chunk_x, chunk_y) {
            tracing::warn!(
                "[Session] {} requested chunk ({}, {}) outside {}x{} chunk grid",
                self.id,
                chunk_x,
                chunk_y,
                chunks.chunks_x(),
                chunks.chunks_y()
            );
            return None;
        }
        // contains_chunk bounds both coordinates to the u32 chunk grid
        let chunk = chunks.get_chunk(chunk_x as u32, chunk_y as u32).await?;
        Some(ServerMessage::PostChunk {
            chunk_x: chunk.chunk_x,
            chunk_y: chunk.chunk_y,
            data: chunk.bytes.to_vec(),
        })
    }

    fn validate_edit(&self, user: UserId, x: i64, y: i64, color: Color) -> Option<EditRequest> {
        let chunks = &self.canvas.chunks;
        let in_bounds = x >= 0 && y >= 0 && x < i64::from(chunks.width()) && y < i64::from(chunks.height());
        if !in_bounds {
            tracing::warn!("[Session] {} sent out of bounds edit ({}, {})", self.id, x, y);
            return None;
        }
        Some(EditRequest {
            user,
            x: x as u32,
            y: y as u32,
            color,
        })
    }

    async fn submit_edit(&self, request: EditRequest) -> Option<ServerMessage> {
        match self.canvas.edits.submit(request).await {
            Ok(EditOutcome::Accepted { timeout_until }) => Some(ServerMessage::timeout_updated(timeout_until)),
            Ok(EditOutcome::CoolingDown { .. }) => None,
            Err(e) => {
                tracing::error!("[Session] {} could not submit edit: {}", self.id, e);
                None
            }
        }
    }

    /// Terminal transition; later requests are refused
    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            tracing::debug!("[Session] {} closed", self.id);
        }
        self.state = SessionState::Closed;
    }
}
