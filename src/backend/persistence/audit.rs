/**
 * Audit Log
 *
 * Append-only record of every accepted edit, one JSON object per line, in
 * one file per UTC day: `<dir>/pixYYYY-MM-DD.hist`.
 *
 * ```text
 * {"x":3,"y":3,"color":[255,0,0],"user":12,"timestamp":1718000000000}
 * ```
 */
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::backend::canvas::AcceptedEdit;
use crate::backend::persistence::PersistenceError;
use crate::shared::Color;

/// One line of the audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub x: u32,
    pub y: u32,
    pub color: Color,
    pub user: i64,
    /// Unix milliseconds
    pub timestamp: i64,
}

impl AuditEntry {
    pub fn from_edit(edit: &AcceptedEdit) -> Self {
        Self {
            x: edit.update.x,
            y: edit.update.y,
            color: edit.update.color,
            user: edit.user.0,
            timestamp: edit.applied_at.timestamp_millis(),
        }
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name_for(date: NaiveDate) -> String {
        format!("pix{}.hist", date.format("%Y-%m-%d"))
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(Self::file_name_for(date))
    }

    /// Append one entry to the file of the entry's UTC day
    pub async fn append(&self, entry: &AuditEntry) -> Result<(), PersistenceError> {
        let path = self.path_for(entry.recorded_at().date_naive());
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersistenceError::io(&self.dir, e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| PersistenceError::io(&path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| PersistenceError::io(&path, e))?;
        file.flush().await.map_err(|e| PersistenceError::io(&path, e))
    }
}
