//! Load-on-mount view over one slice of remote state.
//!
//! Every screen follows the same contract: mount with a token, fetch,
//! replace the local copy wholesale, clear the loading flag. Unmounting
//! cancels the pending fetch, and a result that still arrives afterwards is
//! dropped instead of being applied.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::error::{AppResult, FailureText};
use crate::state::{ScreenContext, NO_TOKEN};

#[async_trait]
pub trait RemoteResource: Send + Sync + 'static {
    type Data: Default + Send + 'static;

    fn failure_text(&self) -> FailureText;

    /// Issue the screen's read request(s); independent reads run concurrently.
    async fn fetch(&self, api: &ApiClient, token: &str) -> AppResult<Self::Data>;
}

struct Slot<T> {
    loading: bool,
    data: T,
    epoch: u64,
}

/// Shared handle to a view's local state, used by sibling screens to merge
/// the results of their writes.
pub struct ViewHandle<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for ViewHandle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Default> Default for ViewHandle<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> ViewHandle<T> {
    pub fn new(data: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                loading: true,
                data,
                epoch: 0,
            })),
        }
    }

    pub async fn is_loading(&self) -> bool {
        self.slot.lock().await.loading
    }

    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.lock().await.data)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.slot.lock().await.data)
    }

    pub async fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.slot.lock().await.data.clone()
    }
}

pub struct RemoteView<R: RemoteResource> {
    resource: Arc<R>,
    handle: ViewHandle<R::Data>,
    task: Option<JoinHandle<()>>,
}

impl<R: RemoteResource> RemoteView<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource: Arc::new(resource),
            handle: ViewHandle::default(),
            task: None,
        }
    }

    pub fn handle(&self) -> ViewHandle<R::Data> {
        self.handle.clone()
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Start loading. A load already in flight is cancelled first.
    pub async fn mount(&mut self, ctx: &ScreenContext) {
        self.cancel();

        let epoch = {
            let mut slot = self.handle.slot.lock().await;
            slot.epoch += 1;
            slot.loading = true;
            if ctx.token.is_none() {
                slot.loading = false;
            }
            slot.epoch
        };

        let Some(token) = ctx.token.clone() else {
            ctx.notices.error(NO_TOKEN);
            return;
        };

        let resource = Arc::clone(&self.resource);
        let slot = Arc::clone(&self.handle.slot);
        let ctx = ctx.clone();
        self.task = Some(tokio::spawn(async move {
            let result = resource.fetch(&ctx.api, &token).await;

            let mut guard = slot.lock().await;
            if guard.epoch != epoch {
                tracing::debug!("Dropping stale result of {}", resource.failure_text().action);
                return;
            }
            guard.loading = false;
            let failure = match result {
                Ok(data) => {
                    guard.data = data;
                    None
                }
                Err(e) => Some(e),
            };
            drop(guard);

            if let Some(e) = failure {
                ctx.report(&e, &resource.failure_text());
            }
        }));
    }

    /// Wait for the current load to finish, if one is running.
    pub async fn settled(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!("Load task failed: {}", e);
                }
            }
        }
    }

    /// Cancel any pending load; its result will never be applied.
    pub async fn unmount(&mut self) {
        self.cancel();
        self.handle.slot.lock().await.epoch += 1;
    }

    pub async fn is_loading(&self) -> bool {
        self.handle.is_loading().await
    }

    pub async fn snapshot(&self) -> R::Data
    where
        R::Data: Clone,
    {
        self.handle.snapshot().await
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<R: RemoteResource> Drop for RemoteView<R> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// What a list screen shows: a spinner, an explicit empty state, or rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Loading,
    Empty(&'static str),
    Items(Vec<T>),
}

impl<T: Clone> Listing<T> {
    pub fn of(loading: bool, items: &[T], empty: &'static str) -> Self {
        if loading {
            Listing::Loading
        } else if items.is_empty() {
            Listing::Empty(empty)
        } else {
            Listing::Items(items.to_vec())
        }
    }
}

/// Result of a user-triggered write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The write succeeded and its response was merged locally.
    Applied,
    /// Rejected before reaching the network.
    Invalid(String),
    /// Disabled for this item, or the same action is already in flight.
    Skipped,
    /// The backend call failed; a notification was pushed.
    Failed,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}
