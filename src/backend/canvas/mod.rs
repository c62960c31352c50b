//! Canvas Module
//!
//! This module owns the authoritative raster and every path that reads or
//! writes it.
//!
//! # Architecture
//!
//! - **`grid`** - `PixelGrid`, the in-memory RGBA buffer
//! - **`chunks`** - `ChunkStore`, clipped chunk reads for clients
//! - **`writer`** - `EditWriter`, the single task that mutates the grid
//!
//! `Canvas` bundles the handles a session needs. It is cheap to clone and is
//! shared through `AppState`.

use chrono::TimeDelta;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::backend::cooldown::CooldownLedger;
use crate::backend::realtime::PixelBroadcast;
use crate::shared::{PixelUpdate, ServerConfig};

/// Authoritative pixel buffer
pub mod grid;

/// Chunked reads
pub mod chunks;

/// Serialized edit application
pub mod writer;

pub use chunks::{Chunk, ChunkStore, SharedGrid};
pub use grid::{CanvasError, PixelGrid, BYTES_PER_PIXEL};
pub use writer::{AcceptedEdit, EditOutcome, EditQueue, EditRequest, EditWriter, JournalSender};

/// Sizing of the canvas runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSettings {
    pub chunk_size: u32,
    pub cooldown: TimeDelta,
    pub edit_queue_capacity: usize,
    pub broadcast_capacity: usize,
}

impl CanvasSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            cooldown: TimeDelta::from_std(config.cooldown()).unwrap_or(TimeDelta::MAX),
            edit_queue_capacity: config.edit_queue_capacity,
            broadcast_capacity: config.broadcast_capacity,
        }
    }
}

/// Handles to the running canvas
#[derive(Debug, Clone)]
pub struct Canvas {
    pub chunks: ChunkStore,
    pub edits: EditQueue,
    pub ledger: CooldownLedger,
    pub updates: PixelBroadcast,
}

impl Canvas {
    /// Take ownership of `grid` and start the edit writer
    pub async fn start(grid: PixelGrid, settings: CanvasSettings, journal: Option<JournalSender>) -> Self {
        tracing::info!(
            "[Canvas] Starting {}x{} canvas, chunk size {}, cooldown {}s",
            grid.width(),
            grid.height(),
            settings.chunk_size,
            settings.cooldown.num_seconds()
        );

        let grid: SharedGrid = Arc::new(RwLock::new(grid));
        let (updates, _) = broadcast::channel::<PixelUpdate>(settings.broadcast_capacity.max(1));
        let ledger = CooldownLedger::new(settings.cooldown);
        let chunks = ChunkStore::new(grid.clone(), settings.chunk_size).await;

        let mut writer = EditWriter::new(grid, ledger.clone(), updates.clone());
        if let Some(journal) = journal {
            writer = writer.with_journal(journal);
        }
        let edits = writer.spawn(settings.edit_queue_capacity);

        Self {
            chunks,
            edits,
            ledger,
            updates,
        }
    }

    pub fn grid(&self) -> &SharedGrid {
        self.chunks.grid()
    }

    /// Receiver for every edit accepted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<PixelUpdate> {
        self.updates.subscribe()
    }
}
