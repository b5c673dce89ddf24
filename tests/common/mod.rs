//! In-process stand-in for the dashboard backend.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use creator_dashboard::api::models::Role;
use creator_dashboard::auth::session::{ROLE_KEY, TOKEN_KEY};
use creator_dashboard::auth::storage::{MemoryStorage, SessionStorage};
use creator_dashboard::config::Config;
use creator_dashboard::state::AppState;

pub const TOKEN: &str = "T";
pub const PASSWORD: &str = "secret";

type Reply = (StatusCode, Json<Value>);

#[derive(Default)]
pub struct Data {
    pub credits: i64,
    pub saved_posts: Vec<String>,
    pub posts: Vec<Value>,
    pub activity: Vec<Value>,
    pub profile: Value,
    pub users: Vec<Value>,
    pub feed_activity: Vec<Value>,
    /// Answer every authenticated request with 401.
    pub reject_token: bool,
    /// Applied before answering a feed read.
    pub feed_delay: Duration,
    /// Applied before answering a credits update.
    pub credits_delay: Duration,
}

#[derive(Clone, Default)]
pub struct Mock {
    data: Arc<Mutex<Data>>,
    hits: Arc<Mutex<HashMap<&'static str, usize>>>,
}

impl Mock {
    pub fn with<R>(&self, f: impl FnOnce(&mut Data) -> R) -> R {
        f(&mut self.data.lock().unwrap())
    }

    pub fn hits(&self, route: &str) -> usize {
        self.hits.lock().unwrap().get(route).copied().unwrap_or(0)
    }

    fn hit(&self, route: &'static str) {
        *self.hits.lock().unwrap().entry(route).or_default() += 1;
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Reply> {
        let bearer = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if bearer != Some(TOKEN) || self.with(|d| d.reject_token) {
            return Err(message(StatusCode::UNAUTHORIZED, "Invalid token"));
        }
        Ok(())
    }
}

fn message(status: StatusCode, text: &str) -> Reply {
    (status, Json(json!({ "message": text })))
}

fn ok(body: Value) -> Reply {
    (StatusCode::OK, Json(body))
}

pub fn post_json(id: &str, url: Option<&str>) -> Value {
    json!({
        "_id": id,
        "content": format!("Post {}", id),
        "source": "reddit",
        "author": "someone",
        "url": url,
        "createdAt": "2024-05-01T10:00:00Z",
    })
}

pub fn user_json(id: &str, email: &str, credits: i64) -> Value {
    json!({ "_id": id, "email": email, "role": "user", "credits": credits })
}

pub struct Backend {
    pub mock: Mock,
    pub url: String,
}

impl Backend {
    pub async fn start(data: Data) -> Self {
        let mock = Mock {
            data: Arc::new(Mutex::new(data)),
            hits: Arc::default(),
        };
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/user/credits", get(credits))
            .route("/api/user/profile", get(profile).put(update_profile))
            .route("/api/user/activity", get(activity))
            .route("/api/feed", get(feed))
            .route("/api/feed/", get(feed))
            .route("/api/feed/{id}/save", post(save))
            .route("/api/feed/{id}/report", post(report))
            .route("/api/admin/users", get(admin_users))
            .route("/api/admin/feed-activity", get(admin_feed_activity))
            .route("/api/admin/users/{id}/credits", put(update_credits))
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            mock,
            url: format!("http://{}", addr),
        }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.api.base_url = self.url.clone();
        config.api.timeout_secs = Some(5);
        config
    }

    pub fn state_with(&self, storage: Arc<dyn SessionStorage>) -> AppState {
        AppState::new(self.config(), storage).unwrap()
    }

    pub fn signed_out(&self) -> AppState {
        self.state_with(Arc::new(MemoryStorage::new()))
    }

    pub fn signed_in(&self, role: Role) -> AppState {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, TOKEN).unwrap();
        storage.set(ROLE_KEY, role.as_str()).unwrap();
        self.state_with(storage)
    }
}

async fn login(State(mock): State<Mock>, Json(body): Json<Value>) -> Reply {
    mock.hit("login");
    if body["password"] != PASSWORD {
        return message(StatusCode::BAD_REQUEST, "Invalid credentials");
    }
    let email = body["email"].as_str().unwrap_or_default();
    let role = if email.starts_with("admin") {
        "admin"
    } else {
        "user"
    };
    ok(json!({ "token": TOKEN, "role": role }))
}

async fn register(State(mock): State<Mock>, Json(body): Json<Value>) -> Reply {
    mock.hit("register");
    if body["email"] == "taken@example.com" {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
}

async fn credits(State(mock): State<Mock>, headers: HeaderMap) -> Reply {
    mock.hit("credits");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    ok(mock.with(|d| json!({ "credits": d.credits })))
}

async fn profile(State(mock): State<Mock>, headers: HeaderMap) -> Reply {
    mock.hit("profile");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    ok(mock.with(|d| json!({ "profile": d.profile, "savedPosts": d.saved_posts })))
}

async fn update_profile(
    State(mock): State<Mock>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    mock.hit("update_profile");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    ok(mock.with(|d| {
        d.profile = body;
        d.credits += 10;
        json!({ "user": { "profile": d.profile, "credits": d.credits } })
    }))
}

async fn activity(State(mock): State<Mock>, headers: HeaderMap) -> Reply {
    mock.hit("activity");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    ok(mock.with(|d| json!(d.activity)))
}

async fn feed(State(mock): State<Mock>, headers: HeaderMap) -> Reply {
    mock.hit("feed");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    let delay = mock.with(|d| d.feed_delay);
    tokio::time::sleep(delay).await;
    ok(mock.with(|d| json!(d.posts)))
}

async fn save(State(mock): State<Mock>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    mock.hit("save");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    mock.with(|d| {
        if d.saved_posts.contains(&id) {
            return message(StatusCode::BAD_REQUEST, "Post already saved");
        }
        d.saved_posts.push(id);
        d.credits += 5;
        ok(json!({ "credits": d.credits }))
    })
}

async fn report(State(mock): State<Mock>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    mock.hit("report");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    mock.with(|d| {
        if !d.posts.iter().any(|p| p["_id"] == id.as_str()) {
            return message(StatusCode::NOT_FOUND, "Post not found");
        }
        d.credits += 3;
        ok(json!({ "credits": d.credits }))
    })
}

async fn admin_users(State(mock): State<Mock>, headers: HeaderMap) -> Reply {
    mock.hit("admin_users");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    ok(mock.with(|d| json!(d.users)))
}

async fn admin_feed_activity(State(mock): State<Mock>, headers: HeaderMap) -> Reply {
    mock.hit("admin_feed_activity");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    ok(mock.with(|d| json!(d.feed_activity)))
}

async fn update_credits(
    State(mock): State<Mock>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    mock.hit("update_credits");
    if let Err(reply) = mock.authorize(&headers) {
        return reply;
    }
    let delay = mock.with(|d| d.credits_delay);
    tokio::time::sleep(delay).await;
    mock.with(|d| {
        let Some(user) = d.users.iter_mut().find(|u| u["_id"] == id.as_str()) else {
            return message(StatusCode::NOT_FOUND, "User not found");
        };
        user["credits"] = body["credits"].clone();
        ok(json!({ "message": "Credits updated" }))
    })
}
