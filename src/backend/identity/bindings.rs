/**
 * Page-Load Bindings
 *
 * Short-lived `address -> fingerprint` map that correlates an HTTP page load
 * with the realtime connection opened right after it. The protocol has two
 * explicit phases:
 *
 * 1. `bind` at page load stores the fingerprint for the caller's address
 * 2. `consume` at the realtime handshake removes and returns it
 *
 * Entries live for a fixed TTL. Expired entries are treated as absent on
 * lookup and are dropped by `sweep`, which the server runs periodically.
 */
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Binding {
    fingerprint: String,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct BindingCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<IpAddr, Binding>>>,
}

impl BindingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store the fingerprint seen at page load; a newer load from the same
    /// address replaces the older one.
    pub fn bind(&self, address: IpAddr, fingerprint: impl Into<String>) {
        self.bind_at(address, fingerprint, Instant::now());
    }

    pub fn bind_at(&self, address: IpAddr, fingerprint: impl Into<String>, now: Instant) {
        let binding = Binding {
            fingerprint: fingerprint.into(),
            expires_at: now + self.ttl,
        };
        self.lock().insert(address, binding);
    }

    /// Remove and return a live binding for `address`
    pub fn consume(&self, address: IpAddr) -> Option<String> {
        self.consume_at(address, Instant::now())
    }

    pub fn consume_at(&self, address: IpAddr, now: Instant) -> Option<String> {
        let binding = self.lock().remove(&address)?;
        if binding.expires_at <= now {
            tracing::debug!("[Identity] Binding for {} expired before handshake", address);
            return None;
        }
        Some(binding.fingerprint)
    }

    /// Drop expired entries; returns how many were removed
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, binding| binding.expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<IpAddr, Binding>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Periodically sweep expired bindings until the runtime shuts down
pub fn spawn_binding_sweeper(cache: BindingCache, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = cache.sweep();
            if removed > 0 {
                tracing::debug!("[Identity] Swept {} expired page-load bindings", removed);
            }
        }
    })
}
