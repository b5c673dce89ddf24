use async_trait::async_trait;

use crate::api::models::Post;
use crate::api::ApiClient;
use crate::error::{AppResult, FailureText};
use crate::screens::dashboard::DashboardData;
use crate::screens::remote::{Listing, RemoteResource, RemoteView, ViewHandle};

pub const EMPTY_SAVED: &str = "No saved posts yet. Discover and save your favorite content!";

/// Feed posts whose ids are in the dashboard's saved set. The fetched feed is
/// kept whole and filtered on every read, so saves made elsewhere show up
/// without a reload.
pub struct SavedPostsResource {
    dashboard: ViewHandle<DashboardData>,
}

impl SavedPostsResource {
    pub fn new(dashboard: ViewHandle<DashboardData>) -> Self {
        Self { dashboard }
    }
}

#[async_trait]
impl RemoteResource for SavedPostsResource {
    type Data = Vec<Post>;

    fn failure_text(&self) -> FailureText {
        FailureText::new("fetching saved posts")
    }

    async fn fetch(&self, api: &ApiClient, token: &str) -> AppResult<Vec<Post>> {
        api.feed(token, false).await
    }
}

pub type SavedPosts = RemoteView<SavedPostsResource>;

impl RemoteView<SavedPostsResource> {
    pub async fn listing(&self) -> Listing<Post> {
        let saved = self.resource().dashboard.read(|d| d.saved_posts.clone()).await;
        let handle = self.handle();
        let loading = handle.is_loading().await;
        handle
            .read(|posts| {
                let kept: Vec<Post> = posts
                    .iter()
                    .filter(|post| saved.contains(&post.id))
                    .cloned()
                    .collect();
                Listing::of(loading, &kept, EMPTY_SAVED)
            })
            .await
    }
}
