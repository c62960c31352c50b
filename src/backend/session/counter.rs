use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Number of live realtime sessions, reported by `/api/stats`
#[derive(Debug, Clone, Default)]
pub struct SessionCounter {
    active: Arc<AtomicUsize>,
}

impl SessionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a session until the returned guard is dropped
    pub fn enter(&self) -> SessionGuard {
        self.active.fetch_add(1, Ordering::Relaxed);
        SessionGuard {
            active: self.active.clone(),
        }
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
pub struct SessionGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }
}
