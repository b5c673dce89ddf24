use async_trait::async_trait;

use crate::api::models::{AdminUserRecord, FeedActivityRecord, ObjectId};
use crate::api::ApiClient;
use crate::error::{AppResult, FailureText};
use crate::screens::gate::ActionGate;
use crate::screens::merge::{merge_by_id, CreditsPatch};
use crate::screens::remote::{Listing, Outcome, RemoteResource, RemoteView};
use crate::state::ScreenContext;

pub const NO_USERS: &str = "No users available.";
pub const NO_FEED_ACTIVITY: &str = "No feed activity available.";
pub const NEGATIVE_CREDITS: &str = "Credits cannot be negative";

const CREDITS_FAILURE: FailureText = FailureText::new("updating credits");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminData {
    pub users: Vec<AdminUserRecord>,
    pub feed_activity: Vec<FeedActivityRecord>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdminResource;

#[async_trait]
impl RemoteResource for AdminResource {
    type Data = AdminData;

    fn failure_text(&self) -> FailureText {
        FailureText::new("fetching data")
    }

    async fn fetch(&self, api: &ApiClient, token: &str) -> AppResult<AdminData> {
        let (users, feed_activity) =
            futures::try_join!(api.admin_users(token), api.admin_feed_activity(token))?;
        Ok(AdminData {
            users,
            feed_activity,
        })
    }
}

/// User credit management and the feed-activity log.
pub struct AdminPanel {
    view: RemoteView<AdminResource>,
    gate: ActionGate,
    expanded: Option<ObjectId>,
}

impl Default for AdminPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminPanel {
    pub fn new() -> Self {
        Self {
            view: RemoteView::new(AdminResource),
            gate: ActionGate::new(),
            expanded: None,
        }
    }

    pub async fn mount(&mut self, ctx: &ScreenContext) {
        self.view.mount(ctx).await;
    }

    pub async fn settled(&mut self) {
        self.view.settled().await;
    }

    pub async fn unmount(&mut self) {
        self.view.unmount().await;
    }

    pub async fn users(&self) -> Listing<AdminUserRecord> {
        let handle = self.view.handle();
        let loading = handle.is_loading().await;
        handle
            .read(|data| Listing::of(loading, &data.users, NO_USERS))
            .await
    }

    pub async fn feed_activity(&self) -> Listing<FeedActivityRecord> {
        let handle = self.view.handle();
        let loading = handle.is_loading().await;
        handle
            .read(|data| Listing::of(loading, &data.feed_activity, NO_FEED_ACTIVITY))
            .await
    }

    /// Expand one activity entry; toggling the expanded one collapses it.
    pub fn toggle_activity(&mut self, id: &ObjectId) {
        self.expanded = match self.expanded.take() {
            Some(current) if &current == id => None,
            _ => Some(id.clone()),
        };
    }

    pub fn expanded(&self) -> Option<&ObjectId> {
        self.expanded.as_ref()
    }

    pub fn is_updating(&self, user: &ObjectId) -> bool {
        self.gate.is_pending(&credits_key(user))
    }

    /// Replace a user's balance. While one update for the user is pending,
    /// further submissions are ignored.
    pub async fn update_credits(
        &self,
        ctx: &ScreenContext,
        user: &ObjectId,
        credits: i64,
    ) -> Outcome {
        if credits < 0 {
            return Outcome::Invalid(NEGATIVE_CREDITS.to_string());
        }
        let Some(_pending) = self.gate.try_begin(credits_key(user)) else {
            return Outcome::Skipped;
        };
        let Ok(token) = ctx.require_token() else {
            return Outcome::Failed;
        };

        match ctx.api.update_user_credits(token, user, credits).await {
            Ok(()) => {
                self.view
                    .handle()
                    .update(|data| merge_by_id(&mut data.users, user, CreditsPatch(credits)))
                    .await;
                ctx.notices.success("Credits updated successfully!");
                Outcome::Applied
            }
            Err(e) => {
                ctx.report(&e, &CREDITS_FAILURE);
                Outcome::Failed
            }
        }
    }
}

fn credits_key(user: &ObjectId) -> String {
    format!("credits:{}", user)
}
