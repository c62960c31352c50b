/**
 * Pixel Update Broadcasting
 *
 * This module provides the fan-out channel for accepted edits. Every active
 * session holds a receiver; the edit writer is the only sender.
 *
 * # Broadcasting
 *
 * Updates are broadcast using `tokio::sync::broadcast`, which delivers every
 * update to every receiver in send order. That gives each session a strict
 * per-session order. A receiver that falls more than the channel capacity
 * behind observes `Lagged` and is expected to drop its connection.
 */

use crate::shared::PixelUpdate;
use tokio::sync::broadcast;

/// Broadcast channel for accepted pixel edits
///
/// # Usage
///
/// ```rust
/// use pixelboard::backend::realtime::PixelBroadcast;
/// use pixelboard::shared::PixelUpdate;
///
/// let (tx, _) = tokio::sync::broadcast::channel::<PixelUpdate>(1024);
/// let broadcast: PixelBroadcast = tx;
/// ```
pub type PixelBroadcast = broadcast::Sender<PixelUpdate>;

/// Broadcast one accepted edit to all subscribers
///
/// # Returns
///
/// Number of active subscribers that received the update (0 if none)
pub fn broadcast_update(broadcast_tx: &PixelBroadcast, update: PixelUpdate) -> usize {
    match broadcast_tx.send(update) {
        Ok(subscriber_count) => {
            tracing::debug!(
                "[Realtime] Update ({}, {}) broadcast to {} sessions",
                update.x,
                update.y,
                subscriber_count
            );
            subscriber_count
        }
        Err(_) => {
            // No sessions connected, nothing to deliver
            tracing::debug!("[Realtime] No sessions to receive update ({}, {})", update.x, update.y);
            0
        }
    }
}
