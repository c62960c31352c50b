use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backend::canvas::AcceptedEdit;
use crate::backend::identity::users;
use crate::backend::persistence::{AuditEntry, AuditLog};

/// Persist accepted edits off the edit path.
///
/// Each edit is appended to the audit log; edits by regular users also
/// update their cooldown expiry and counter in the user store. The admin
/// identity has no store row.
pub fn spawn_edit_journal(
    mut edits: mpsc::Receiver<AcceptedEdit>,
    audit: AuditLog,
    pool: SqlitePool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("[Journal] Writing audit log to {}", audit.dir().display());
        while let Some(edit) = edits.recv().await {
            if let Err(e) = audit.append(&AuditEntry::from_edit(&edit)).await {
                tracing::error!(
                    "[Journal] CRITICAL: audit entry for ({}, {}) not written: {}",
                    edit.update.x,
                    edit.update.y,
                    e
                );
            }

            if edit.user.is_admin() {
                continue;
            }
            if let Err(e) = users::record_edit(&pool, edit.user, edit.timeout_until).await {
                tracing::error!("[Journal] CRITICAL: failed to persist edit by user {}: {:?}", edit.user, e);
            }
        }
        tracing::info!("[Journal] Edit stream closed");
    })
}
