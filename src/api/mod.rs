//! HTTP client for the creator dashboard backend.

pub mod models;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use models::{
    ActivityEntry, AdminUserRecord, Credentials, CreditsResponse, CreditsUpdate, ErrorBody,
    FeedActivityRecord, LoginResponse, ObjectId, Post, Profile, ProfileResponse,
    ProfileUpdateResponse, Registration,
};

/// Thin typed wrapper over the REST endpoints. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(AppError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // --- Auth ---

    pub async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse> {
        let req = self.request(Method::POST, &["api", "auth", "login"], None)?;
        read_json(req.json(credentials)).await
    }

    pub async fn register(&self, registration: &Registration) -> AppResult<()> {
        let req = self.request(Method::POST, &["api", "auth", "register"], None)?;
        read_empty(req.json(registration)).await
    }

    // --- User ---

    pub async fn credits(&self, token: &str) -> AppResult<CreditsResponse> {
        let req = self.request(Method::GET, &["api", "user", "credits"], Some(token))?;
        read_json(req).await
    }

    pub async fn profile(&self, token: &str) -> AppResult<ProfileResponse> {
        let req = self.request(Method::GET, &["api", "user", "profile"], Some(token))?;
        read_json(req).await
    }

    pub async fn update_profile(
        &self,
        token: &str,
        profile: &Profile,
    ) -> AppResult<ProfileUpdateResponse> {
        let req = self.request(Method::PUT, &["api", "user", "profile"], Some(token))?;
        read_json(req.json(profile)).await
    }

    pub async fn activity(&self, token: &str) -> AppResult<Vec<ActivityEntry>> {
        let req = self.request(Method::GET, &["api", "user", "activity"], Some(token))?;
        read_json(req).await
    }

    // --- Feed ---

    /// The feed screen asks for `/api/feed/`, the saved-posts screen for `/api/feed`.
    pub async fn feed(&self, token: &str, trailing_slash: bool) -> AppResult<Vec<Post>> {
        let path: &[&str] = if trailing_slash {
            &["api", "feed", ""]
        } else {
            &["api", "feed"]
        };
        let req = self.request(Method::GET, path, Some(token))?;
        read_json(req).await
    }

    pub async fn save_post(&self, token: &str, id: &ObjectId) -> AppResult<CreditsResponse> {
        let req = self.request(
            Method::POST,
            &["api", "feed", id.as_str(), "save"],
            Some(token),
        )?;
        read_json(req.json(&serde_json::json!({}))).await
    }

    pub async fn report_post(&self, token: &str, id: &ObjectId) -> AppResult<CreditsResponse> {
        let req = self.request(
            Method::POST,
            &["api", "feed", id.as_str(), "report"],
            Some(token),
        )?;
        read_json(req.json(&serde_json::json!({}))).await
    }

    // --- Admin ---

    pub async fn admin_users(&self, token: &str) -> AppResult<Vec<AdminUserRecord>> {
        let req = self.request(Method::GET, &["api", "admin", "users"], Some(token))?;
        read_json(req).await
    }

    pub async fn admin_feed_activity(&self, token: &str) -> AppResult<Vec<FeedActivityRecord>> {
        let req = self.request(Method::GET, &["api", "admin", "feed-activity"], Some(token))?;
        read_json(req).await
    }

    pub async fn update_user_credits(
        &self,
        token: &str,
        user: &ObjectId,
        credits: i64,
    ) -> AppResult<()> {
        let req = self.request(
            Method::PUT,
            &["api", "admin", "users", user.as_str(), "credits"],
            Some(token),
        )?;
        read_empty(req.json(&CreditsUpdate { credits })).await
    }

    // --- Internal helpers ---

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut target = self.base.clone();
        target
            .path_segments_mut()
            .map_err(|_| AppError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(target)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> AppResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{} {}", method, url);
        let req = self.client.request(method, url);
        Ok(match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }
}

async fn send(req: RequestBuilder) -> AppResult<Response> {
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp
        .bytes()
        .await
        .ok()
        .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
        .and_then(|body| body.message);
    tracing::debug!("Backend answered {}: {:?}", status, message);
    Err(AppError::from_status(status, message))
}

async fn read_json<T: DeserializeOwned>(req: RequestBuilder) -> AppResult<T> {
    let body = send(req).await?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn read_empty(req: RequestBuilder) -> AppResult<()> {
    send(req).await?;
    Ok(())
}
