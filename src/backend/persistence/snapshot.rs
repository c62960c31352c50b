/**
 * Snapshot Store
 *
 * PNG snapshots of the canvas under the cache directory:
 *
 * - `latest.png`, overwritten periodically and restored at startup
 * - `canvas/YYYY-MM-DD/<unix millis>.png`, dated backups
 *
 * Encoding and decoding run on the blocking pool. Files are written to a
 * temporary sibling first and renamed into place.
 */
use chrono::{DateTime, Utc};
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, ImageEncoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::backend::canvas::{PixelGrid, SharedGrid};
use crate::backend::persistence::PersistenceError;

const LATEST_FILE: &str = "latest.png";
const BACKUP_DIR: &str = "canvas";

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(LATEST_FILE)
    }

    pub fn backup_path(&self, at: DateTime<Utc>) -> PathBuf {
        self.dir
            .join(BACKUP_DIR)
            .join(at.format("%Y-%m-%d").to_string())
            .join(format!("{}.png", at.timestamp_millis()))
    }

    /// Restore `latest.png` as a `width` x `height` grid.
    ///
    /// Returns `Ok(None)` when no snapshot exists. A snapshot of another
    /// size is scaled to fit.
    pub async fn load_latest(&self, width: u32, height: u32) -> Result<Option<PixelGrid>, PersistenceError> {
        let path = self.latest_path();
        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| PersistenceError::io(&path, e))?
        {
            return Ok(None);
        }

        let grid = tokio::task::spawn_blocking(move || -> Result<PixelGrid, PersistenceError> {
            let mut rgba = image::open(&path)?.into_rgba8();
            if rgba.dimensions() != (width, height) {
                tracing::warn!(
                    "[Snapshot] {} is {}x{}, scaling to {}x{}",
                    path.display(),
                    rgba.width(),
                    rgba.height(),
                    width,
                    height
                );
                rgba = image::imageops::resize(&rgba, width, height, FilterType::Nearest);
            }
            PixelGrid::from_rgba(width, height, rgba.into_raw())
                .map_err(|_| PersistenceError::Dimensions { width, height })
        })
        .await??;

        tracing::info!("[Snapshot] Restored canvas from {}", self.latest_path().display());
        Ok(Some(grid))
    }

    pub async fn save_latest(&self, grid: &SharedGrid) -> Result<PathBuf, PersistenceError> {
        let path = self.latest_path();
        save_grid(grid, path.clone()).await?;
        tracing::debug!("[Snapshot] Saved {}", path.display());
        Ok(path)
    }

    pub async fn save_backup(&self, grid: &SharedGrid, at: DateTime<Utc>) -> Result<PathBuf, PersistenceError> {
        let path = self.backup_path(at);
        save_grid(grid, path.clone()).await?;
        tracing::info!("[Snapshot] Saved backup {}", path.display());
        Ok(path)
    }
}

async fn save_grid(grid: &SharedGrid, path: PathBuf) -> Result<(), PersistenceError> {
    let (width, height, rgba) = {
        let grid = grid.read().await;
        (grid.width(), grid.height(), grid.snapshot())
    };
    tokio::task::spawn_blocking(move || write_png(&path, width, height, &rgba)).await?
}

fn write_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
    }
    let tmp = path.with_extension("png.tmp");
    let file = File::create(&tmp).map_err(|e| PersistenceError::io(&tmp, e))?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new(&mut writer).write_image(rgba, width, height, ColorType::Rgba8)?;
    writer.flush().map_err(|e| PersistenceError::io(&tmp, e))?;
    drop(writer);
    std::fs::rename(&tmp, path).map_err(|e| PersistenceError::io(path, e))
}

/// Periodically save `latest.png` and dated backups
pub fn spawn_snapshot_task(
    store: SnapshotStore,
    grid: SharedGrid,
    latest_every: Duration,
    backup_every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut latest = interval_at(Instant::now() + latest_every, latest_every);
        let mut backup = interval_at(Instant::now() + backup_every, backup_every);
        latest.set_missed_tick_behavior(MissedTickBehavior::Skip);
        backup.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = latest.tick() => {
                    if let Err(e) = store.save_latest(&grid).await {
                        tracing::error!("[Snapshot] CRITICAL: {} not saved: {}", store.latest_path().display(), e);
                    }
                }
                _ = backup.tick() => {
                    if let Err(e) = store.save_backup(&grid, Utc::now()).await {
                        tracing::error!("[Snapshot] CRITICAL: backup not saved: {}", e);
                    }
                }
            }
        }
    })
}
