use async_trait::async_trait;

use crate::api::models::{ActivityEntry, ObjectId};
use crate::api::ApiClient;
use crate::error::{AppResult, FailureText};
use crate::screens::remote::{RemoteResource, RemoteView};

/// State owned by the dashboard shell and shared with its sub-views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub credits: i64,
    /// Grows by one id per successful save; never shrinks.
    pub saved_posts: Vec<ObjectId>,
    /// Newest first once local entries are prepended.
    pub activities: Vec<ActivityEntry>,
}

impl DashboardData {
    pub fn is_saved(&self, id: &ObjectId) -> bool {
        self.saved_posts.contains(id)
    }

    pub fn add_saved(&mut self, id: ObjectId) {
        if !self.is_saved(&id) {
            self.saved_posts.push(id);
        }
    }

    pub fn prepend_activity(&mut self, entry: ActivityEntry) {
        self.activities.insert(0, entry);
    }
}

/// Credits, saved post ids and activity, loaded in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardResource;

#[async_trait]
impl RemoteResource for DashboardResource {
    type Data = DashboardData;

    fn failure_text(&self) -> FailureText {
        FailureText::new("fetching data")
    }

    async fn fetch(&self, api: &ApiClient, token: &str) -> AppResult<DashboardData> {
        let (credits, profile, activities) = futures::try_join!(
            api.credits(token),
            api.profile(token),
            api.activity(token),
        )?;
        Ok(DashboardData {
            credits: credits.balance(),
            saved_posts: profile.saved_posts.unwrap_or_default(),
            activities,
        })
    }
}

pub type Dashboard = RemoteView<DashboardResource>;
