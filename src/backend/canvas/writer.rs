/**
 * Edit Writer
 *
 * The single serialization point for canvas mutation. Sessions submit edits
 * through an `EditQueue`; one task drains the queue and for each edit:
 *
 * 1. checks the cooldown ledger and rejects if the identity is cooling down
 * 2. takes the grid write lock, sets the pixel, publishes the broadcast
 * 3. records the edit in the ledger
 * 4. hands the accepted edit to the journal (audit log + user store)
 * 5. replies to the submitting session with the new expiry
 *
 * Step 2 publishes before releasing the lock, which is what keeps chunk
 * reads and broadcasts consistent for every session.
 *
 * The journal channel is bounded and never awaited. When it is full the
 * edit stays applied and broadcast, and only its persistence is dropped.
 */
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::backend::canvas::chunks::SharedGrid;
use crate::backend::canvas::grid::CanvasError;
use crate::backend::cooldown::CooldownLedger;
use crate::backend::identity::UserId;
use crate::backend::realtime::{broadcast_update, PixelBroadcast};
use crate::shared::{Color, PixelUpdate};

/// A validated edit waiting to be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRequest {
    pub user: UserId,
    pub x: u32,
    pub y: u32,
    pub color: Color,
}

/// Result reported back to the submitting session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Applied and broadcast; the identity is now cooling down until `timeout_until`
    Accepted { timeout_until: DateTime<Utc> },
    /// Dropped because the identity is still cooling down
    CoolingDown { timeout_until: DateTime<Utc> },
}

/// An applied edit, handed to the journal off the hot path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedEdit {
    pub user: UserId,
    pub update: PixelUpdate,
    pub timeout_until: DateTime<Utc>,
    pub applied_at: DateTime<Utc>,
}

/// Sender for accepted edits; the receiving side is `persistence::journal`
pub type JournalSender = mpsc::Sender<AcceptedEdit>;

struct EditCommand {
    request: EditRequest,
    reply: oneshot::Sender<EditOutcome>,
}

/// Cloneable handle for submitting edits to the writer task
#[derive(Debug, Clone)]
pub struct EditQueue {
    tx: mpsc::Sender<EditCommand>,
}

impl std::fmt::Debug for EditCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditCommand").field("request", &self.request).finish()
    }
}

impl EditQueue {
    /// Submit an edit and wait for the writer's verdict
    pub async fn submit(&self, request: EditRequest) -> Result<EditOutcome, CanvasError> {
        let (reply, outcome) = oneshot::channel();
        self.tx
            .send(EditCommand { request, reply })
            .await
            .map_err(|_| CanvasError::WriterClosed)?;
        outcome.await.map_err(|_| CanvasError::WriterClosed)
    }
}

pub struct EditWriter {
    grid: SharedGrid,
    ledger: CooldownLedger,
    updates: PixelBroadcast,
    journal: Option<JournalSender>,
}

impl EditWriter {
    pub fn new(grid: SharedGrid, ledger: CooldownLedger, updates: PixelBroadcast) -> Self {
        Self {
            grid,
            ledger,
            updates,
            journal: None,
        }
    }

    pub fn with_journal(mut self, journal: JournalSender) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Start the writer task and return the queue feeding it
    pub fn spawn(self, capacity: usize) -> EditQueue {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(self.run(rx));
        EditQueue { tx }
    }

    async fn run(self, mut rx: mpsc::Receiver<EditCommand>) {
        tracing::info!("[Canvas] Edit writer started");
        while let Some(EditCommand { request, reply }) = rx.recv().await {
            let outcome = self.apply(request, Utc::now()).await;
            // The session may have gone away while waiting
            let _ = reply.send(outcome);
        }
        tracing::info!("[Canvas] Edit queue closed, writer stopping");
    }

    async fn apply(&self, request: EditRequest, now: DateTime<Utc>) -> EditOutcome {
        let EditRequest { user, x, y, color } = request;

        if !self.ledger.can_edit_at(user, now) {
            let timeout_until = self.ledger.time_remaining_at(user, now);
            tracing::info!(
                "[Canvas] Rejected edit ({}, {}) from user {}: cooling down until {}",
                x,
                y,
                user,
                timeout_until
            );
            return EditOutcome::CoolingDown { timeout_until };
        }

        let update = PixelUpdate { x, y, color };
        {
            let mut grid = self.grid.write().await;
            grid.set_pixel(x, y, color);
            broadcast_update(&self.updates, update);
        }

        let timeout_until = self.ledger.record_edit_at(user, now);
        tracing::info!(
            "[Canvas] Pixel placed at ({}, {}) color {:?} by user {}",
            x,
            y,
            color.0,
            user
        );

        if let Some(journal) = &self.journal {
            let accepted = AcceptedEdit {
                user,
                update,
                timeout_until,
                applied_at: now,
            };
            match journal.try_send(accepted) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => tracing::error!(
                    "[Canvas] CRITICAL: edit journal full; edit ({}, {}) by user {} not persisted",
                    x,
                    y,
                    user
                ),
                Err(TrySendError::Closed(_)) => {
                    tracing::error!("[Canvas] Edit journal is gone; edit by user {} not persisted", user)
                }
            }
        }

        EditOutcome::Accepted { timeout_until }
    }
}
