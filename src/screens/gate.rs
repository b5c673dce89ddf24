use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Allows at most one in-flight write per action key.
#[derive(Clone, Default)]
pub struct ActionGate {
    inflight: Arc<Mutex<HashSet<String>>>,
}

impl ActionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`; `None` while another holder is still pending.
    pub fn try_begin(&self, key: impl Into<String>) -> Option<Pending> {
        let key = key.into();
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if !inflight.insert(key.clone()) {
            tracing::debug!("Ignoring duplicate submit of {}", key);
            return None;
        }
        Some(Pending {
            gate: self.clone(),
            key,
        })
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Releases its key when dropped.
pub struct Pending {
    gate: ActionGate,
    key: String,
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.gate
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
