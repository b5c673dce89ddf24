//! Transient user-facing messages with timed auto-dismissal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

/// How long a notification stays visible unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoticeKind {
    #[default]
    Success,
    Error,
}

impl NoticeKind {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✗",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, NoticeKind::Error)
    }
}

struct Entry {
    notice: Notification,
    expires_at: Instant,
}

struct Inner {
    ttl: Duration,
    next_id: AtomicU64,
    queue: Mutex<Vec<Entry>>,
    events: broadcast::Sender<Notification>,
}

/// Process-wide notification queue. Clones share the same queue.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                ttl,
                next_id: AtomicU64::new(1),
                queue: Mutex::new(Vec::new()),
                events,
            }),
        }
    }

    /// Append a notification and schedule its removal after the TTL.
    /// Identical messages are not merged.
    pub fn push(&self, message: impl Into<String>, kind: NoticeKind) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let notice = Notification {
            id,
            message: message.into(),
            kind,
        };
        let expires_at = Instant::now() + self.inner.ttl;

        match kind {
            NoticeKind::Success => tracing::debug!("Notice #{}: {}", id, notice.message),
            NoticeKind::Error => tracing::warn!("Notice #{}: {}", id, notice.message),
        }

        self.queue().push(Entry {
            notice: notice.clone(),
            expires_at,
        });
        let _ = self.inner.events.send(notice);

        // Outside a runtime the entry still disappears from `visible()` once
        // expired; it is just never reaped from the queue.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let center = self.clone();
            handle.spawn(async move {
                tokio::time::sleep_until(expires_at).await;
                center.dismiss(id);
            });
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeKind::Error)
    }

    /// Remove a notification by id. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut queue = self.queue();
        let before = queue.len();
        queue.retain(|entry| entry.notice.id != id);
        before != queue.len()
    }

    /// Notifications that have not expired yet, oldest first.
    pub fn visible(&self) -> Vec<Notification> {
        let now = Instant::now();
        self.queue()
            .iter()
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.notice.clone())
            .collect()
    }

    /// Receive every notification as it is pushed.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.events.subscribe()
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    #[cfg(test)]
    fn queued(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.inner
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
