use async_trait::async_trait;

use crate::api::models::{ActivityEntry, ObjectId, Post};
use crate::api::ApiClient;
use crate::error::{AppResult, FailureText};
use crate::screens::dashboard::DashboardData;
use crate::screens::gate::ActionGate;
use crate::screens::merge::{merge_by_id, PostPatch};
use crate::screens::remote::{Listing, Outcome, RemoteResource, RemoteView, ViewHandle};
use crate::state::ScreenContext;

pub const EMPTY_FEED: &str = "No posts available.";

const SAVE_FAILURE: FailureText = FailureText::new("saving post")
    .not_found("Post not found.")
    .bad_request("Post already saved.");

const REPORT_FAILURE: FailureText = FailureText::new("reporting post")
    .not_found("Post not found.")
    .bad_request("Post already reported.");

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedResource;

#[async_trait]
impl RemoteResource for FeedResource {
    type Data = Vec<Post>;

    fn failure_text(&self) -> FailureText {
        FailureText::new("fetching feed").not_found("Feed not found. Please check the API endpoint.")
    }

    async fn fetch(&self, api: &ApiClient, token: &str) -> AppResult<Vec<Post>> {
        api.feed(token, true).await
    }
}

/// The social feed: save, report and share posts.
pub struct FeedScreen {
    view: RemoteView<FeedResource>,
    dashboard: ViewHandle<DashboardData>,
    gate: ActionGate,
}

impl FeedScreen {
    pub fn new(dashboard: ViewHandle<DashboardData>) -> Self {
        Self {
            view: RemoteView::new(FeedResource),
            dashboard,
            gate: ActionGate::new(),
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

    pub async fn posts(&self) -> Listing<Post> {
        let handle = self.view.handle();
        let loading = handle.is_loading().await;
        handle
            .read(|posts| Listing::of(loading, posts, EMPTY_FEED))
            .await
    }

    pub async fn post(&self, id: &ObjectId) -> Option<Post> {
        self.view
            .handle()
            .read(|posts| posts.iter().find(|p| &p.id == id).cloned())
            .await
    }

    /// Saving is disabled once the post is in the saved set or flagged saved.
    pub async fn can_save(&self, id: &ObjectId) -> bool {
        if self.dashboard.read(|d| d.is_saved(id)).await {
            return false;
        }
        !self.post(id).await.is_some_and(|p| p.saved)
    }

    pub async fn can_report(&self, id: &ObjectId) -> bool {
        !self.post(id).await.is_some_and(|p| p.reported)
    }

    pub async fn save(&self, ctx: &ScreenContext, id: &ObjectId) -> Outcome {
        let Some(_pending) = self.gate.try_begin(format!("save:{}", id)) else {
            return Outcome::Skipped;
        };
        // Checked under the gate so a submit that finished meanwhile counts.
        if !self.can_save(id).await {
            tracing::debug!("Save of {} is disabled", id);
            return Outcome::Skipped;
        }
        let Ok(token) = ctx.require_token() else {
            return Outcome::Failed;
        };

        match ctx.api.save_post(token, id).await {
            Ok(res) => {
                self.view
                    .handle()
                    .update(|posts| merge_by_id(posts, id, PostPatch::saved()))
                    .await;
                self.dashboard
                    .update(|d| {
                        d.credits = res.balance();
                        d.add_saved(id.clone());
                        d.prepend_activity(ActivityEntry::local(
                            "save_post",
                            format!("Post {} saved", id),
                        ));
                    })
                    .await;
                ctx.notices
                    .success("Post saved successfully! Earned 5 credits.");
                Outcome::Applied
            }
            Err(e) => {
                ctx.report(&e, &SAVE_FAILURE);
                Outcome::Failed
            }
        }
    }

    pub async fn report(&self, ctx: &ScreenContext, id: &ObjectId) -> Outcome {
        let Some(_pending) = self.gate.try_begin(format!("report:{}", id)) else {
            return Outcome::Skipped;
        };
        // Checked under the gate so a submit that finished meanwhile counts.
        if !self.can_report(id).await {
            tracing::debug!("Report of {} is disabled", id);
            return Outcome::Skipped;
        }
        let Ok(token) = ctx.require_token() else {
            return Outcome::Failed;
        };

        match ctx.api.report_post(token, id).await {
            Ok(res) => {
                self.view
                    .handle()
                    .update(|posts| merge_by_id(posts, id, PostPatch::reported()))
                    .await;
                self.dashboard
                    .update(|d| {
                        d.credits = res.balance();
                        d.prepend_activity(ActivityEntry::local(
                            "report_post",
                            format!("Post {} reported", id),
                        ));
                    })
                    .await;
                ctx.notices
                    .success("Post reported successfully! Earned 3 credits.");
                Outcome::Applied
            }
            Err(e) => {
                ctx.report(&e, &REPORT_FAILURE);
                Outcome::Failed
            }
        }
    }

    /// The post's link, for the caller to place on the clipboard.
    pub async fn share(&self, ctx: &ScreenContext, id: &ObjectId) -> Option<String> {
        match self.post(id).await.and_then(|p| p.url) {
            Some(url) => {
                ctx.notices.success("Link copied to clipboard!");
                Some(url)
            }
            None => {
                ctx.notices.error("No link available for this post.");
                None
            }
        }
    }
}
