use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::identity::{Identity, UserId};

/// Cooldown state of one identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownEntry {
    pub timeout_until: Option<DateTime<Utc>>,
    pub modified_pixels: i64,
}

/// Shared per-identity cooldown ledger
///
/// Keyed by identity, not connection: a second tab or a reconnect sees the
/// same expiry.
#[derive(Debug, Clone)]
pub struct CooldownLedger {
    window: TimeDelta,
    entries: Arc<Mutex<HashMap<UserId, CooldownEntry>>>,
}

impl CooldownLedger {
    pub fn new(window: TimeDelta) -> Self {
        Self {
            window,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// Load persisted state for an identity at handshake.
    ///
    /// An entry already in memory wins: it is at least as fresh as the store,
    /// whose writes trail the ledger.
    pub fn seed(&self, identity: &Identity) {
        self.lock().entry(identity.user_id).or_insert(CooldownEntry {
            timeout_until: identity.timeout_until,
            modified_pixels: identity.modified_pixels,
        });
    }

    pub fn can_edit(&self, user: UserId) -> bool {
        self.can_edit_at(user, Utc::now())
    }

    /// `now >= timeout_until`; always true for the admin identity
    pub fn can_edit_at(&self, user: UserId, now: DateTime<Utc>) -> bool {
        if user.is_admin() {
            return true;
        }
        match self.lock().get(&user).and_then(|entry| entry.timeout_until) {
            Some(timeout_until) => now >= timeout_until,
            None => true,
        }
    }

    pub fn record_edit(&self, user: UserId) -> DateTime<Utc> {
        self.record_edit_at(user, Utc::now())
    }

    /// Start a new cooldown window at `now` and count the edit.
    ///
    /// Returns the new expiry. The admin identity is counted but never put
    /// on cooldown, so its expiry is `now`.
    pub fn record_edit_at(&self, user: UserId, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut entries = self.lock();
        let entry = entries.entry(user).or_default();
        entry.modified_pixels += 1;
        if user.is_admin() {
            return now;
        }
        let expiry = now.checked_add_signed(self.window).unwrap_or(DateTime::<Utc>::MAX_UTC);
        entry.timeout_until = Some(expiry);
        expiry
    }

    pub fn time_remaining(&self, user: UserId) -> DateTime<Utc> {
        self.time_remaining_at(user, Utc::now())
    }

    /// Absolute cooldown expiry for the client countdown; `now` when the
    /// identity is free to edit.
    pub fn time_remaining_at(&self, user: UserId, now: DateTime<Utc>) -> DateTime<Utc> {
        if user.is_admin() {
            return now;
        }
        self.lock()
            .get(&user)
            .and_then(|entry| entry.timeout_until)
            .filter(|timeout_until| *timeout_until > now)
            .unwrap_or(now)
    }

    pub fn entry(&self, user: UserId) -> Option<CooldownEntry> {
        self.lock().get(&user).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn prune_expired(&self) -> usize {
        self.prune_expired_at(Utc::now())
    }

    /// Drop entries that no longer hold anyone back; returns how many went.
    ///
    /// A pruned identity edits freely, exactly as it would with the entry
    /// still present, and is re-seeded from the store at its next handshake.
    pub fn prune_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.timeout_until.is_some_and(|until| until > now));
        before - entries.len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, CooldownEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Periodically prune expired cooldowns until the runtime shuts down
pub fn spawn_ledger_sweeper(ledger: CooldownLedger, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = ledger.prune_expired();
            if removed > 0 {
                tracing::debug!("[Cooldown] Pruned {} expired cooldowns, {} remain", removed, ledger.len());
            }
        }
    })
}
