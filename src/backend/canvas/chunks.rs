/**
 * Chunk Store
 *
 * Translates chunk coordinates into reads of the shared grid. Nothing is
 * cached server-side: a chunk is a view of the grid that gets materialized
 * into an immutable `Bytes` snapshot only when it is sent.
 */
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::canvas::grid::PixelGrid;

/// Grid handle shared by the chunk store, the edit writer and snapshots
pub type SharedGrid = Arc<RwLock<PixelGrid>>;

/// A materialized chunk ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub chunk_x: u32,
    pub chunk_y: u32,
    /// Clipped width in pixels
    pub width: u32,
    /// Clipped height in pixels
    pub height: u32,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct ChunkStore {
    grid: SharedGrid,
    width: u32,
    height: u32,
    chunk_size: u32,
}

impl ChunkStore {
    /// `width` and `height` are read once; the grid never changes size.
    pub async fn new(grid: SharedGrid, chunk_size: u32) -> Self {
        let (width, height) = {
            let guard = grid.read().await;
            (guard.width(), guard.height())
        };
        Self {
            grid,
            width,
            height,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Number of chunk columns, counting a partial last column
    pub fn chunks_x(&self) -> u32 {
        self.width.div_ceil(self.chunk_size)
    }

    /// Number of chunk rows, counting a partial last row
    pub fn chunks_y(&self) -> u32 {
        self.height.div_ceil(self.chunk_size)
    }

    pub fn contains_chunk(&self, chunk_x: i64, chunk_y: i64) -> bool {
        chunk_x >= 0
            && chunk_y >= 0
            && chunk_x < i64::from(self.chunks_x())
            && chunk_y < i64::from(self.chunks_y())
    }

    /// Read one chunk. Coordinates outside the chunk grid yield `None`; they
    /// are never clamped onto a neighbouring chunk.
    pub async fn get_chunk(&self, chunk_x: u32, chunk_y: u32) -> Option<Chunk> {
        if !self.contains_chunk(i64::from(chunk_x), i64::from(chunk_y)) {
            return None;
        }
        let grid = self.grid.read().await;
        let (_, _, width, height) = grid.chunk_bounds(chunk_x, chunk_y, self.chunk_size);
        let bytes = grid.chunk_bytes(chunk_x, chunk_y, self.chunk_size);
        Some(Chunk {
            chunk_x,
            chunk_y,
            width,
            height,
            bytes: Bytes::from(bytes),
        })
    }

    /// Copy of the full RGBA buffer
    pub async fn snapshot(&self) -> Vec<u8> {
        self.grid.read().await.snapshot()
    }
}
