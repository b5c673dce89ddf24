use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::session::SessionStore;
use crate::auth::storage::{FileStorage, MemoryStorage, SessionStorage};
use crate::config::Config;
use crate::error::{AppError, AppResult, FailureText};
use crate::notifications::NotificationCenter;

pub const NO_TOKEN: &str = "No token provided. Please log in.";

/// Called when the backend rejects the session token.
pub type LogoutHook = Arc<dyn Fn() + Send + Sync>;

/// Root-owned state handed explicitly to every screen.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub session: SessionStore,
    pub notices: NotificationCenter,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn SessionStorage>) -> AppResult<Self> {
        let api = ApiClient::new(&config.api)?;
        let notices = NotificationCenter::new(config.notifications.ttl());
        let session = SessionStore::load(storage, notices.clone());
        Ok(Self {
            config,
            api,
            session,
            notices,
        })
    }

    /// Build with file-backed storage when a storage path is configured.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let storage: Arc<dyn SessionStorage> = match config.storage_path() {
            Some(path) => Arc::new(FileStorage::new(path)),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::new(config, storage)
    }

    /// Context for a screen mounted now: the current token plus a hook that
    /// logs the session out when the backend rejects it.
    pub fn screen_context(&self) -> ScreenContext {
        let session = self.session.clone();
        ScreenContext::new(self.api.clone(), self.notices.clone(), self.session.token())
            .with_logout(Arc::new(move || {
                // Several screens can see the same rejected token.
                if session.current().is_authenticated() {
                    session.logout();
                }
            }))
    }
}

/// What a screen needs to talk to the backend and report back.
#[derive(Clone)]
pub struct ScreenContext {
    pub api: ApiClient,
    pub notices: NotificationCenter,
    pub token: Option<String>,
    on_unauthorized: Option<LogoutHook>,
}

impl ScreenContext {
    pub fn new(api: ApiClient, notices: NotificationCenter, token: Option<String>) -> Self {
        Self {
            api,
            notices,
            token,
            on_unauthorized: None,
        }
    }

    pub fn with_logout(mut self, hook: LogoutHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    /// The session token, or an error notification when there is none.
    pub fn require_token(&self) -> AppResult<&str> {
        self.token.as_deref().ok_or_else(|| {
            self.notices.error(NO_TOKEN);
            AppError::NoSession
        })
    }

    /// Surface a failed action and force a logout if the session was rejected.
    pub fn report(&self, err: &AppError, text: &FailureText) {
        tracing::warn!("{} failed: {}", text.action, err);
        self.notices.error(err.user_message(text));
        if err.is_unauthorized() {
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
        }
    }
}
