use std::sync::Arc;

use tokio::sync::watch;

use crate::api::models::Role;
use crate::auth::storage::SessionStorage;
use crate::error::AppResult;
use crate::notifications::NotificationCenter;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";

/// Token and role are always both present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    pub fn signed_in(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: Some(token.into()),
            role: Some(role),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

/// Owner of the current session. Clones share state and storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: Arc<watch::Sender<Session>>,
    notices: NotificationCenter,
}

impl SessionStore {
    /// Restore the last committed session from storage.
    pub fn load(storage: Arc<dyn SessionStorage>, notices: NotificationCenter) -> Self {
        let token = storage.get(TOKEN_KEY);
        let role = storage.get(ROLE_KEY);

        let session = match (token, role.as_deref().map(str::parse::<Role>)) {
            (Some(token), Some(Ok(role))) => Session::signed_in(token, role),
            (None, None) => Session::default(),
            _ => {
                tracing::warn!("Discarding incomplete stored session");
                clear_storage(storage.as_ref());
                Session::default()
            }
        };

        if session.is_authenticated() {
            tracing::info!("Restored session ({})", session.role.map_or("?", Role::as_str));
        }

        let (state, _) = watch::channel(session);
        Self {
            storage,
            state: Arc::new(state),
            notices,
        }
    }

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn login(&self, token: &str, role: Role) -> AppResult<()> {
        self.storage.set(TOKEN_KEY, token)?;
        if let Err(e) = self.storage.set(ROLE_KEY, role.as_str()) {
            clear_storage(self.storage.as_ref());
            return Err(e);
        }

        self.state.send_replace(Session::signed_in(token, role));
        tracing::info!("Logged in as {}", role);
        self.notices.success("Logged in successfully!");
        Ok(())
    }

    pub fn logout(&self) {
        self.state.send_replace(Session::default());
        clear_storage(self.storage.as_ref());
        tracing::info!("Logged out");
        self.notices.success("Logged out successfully!");
    }
}

fn clear_storage(storage: &dyn SessionStorage) {
    for key in [TOKEN_KEY, ROLE_KEY] {
        if let Err(e) = storage.remove(key) {
            tracing::warn!("Failed to clear stored {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::{FileStorage, MemoryStorage};

    fn store(storage: Arc<dyn SessionStorage>) -> SessionStore {
        SessionStore::load(storage, NotificationCenter::default())
    }

    #[test]
    fn login_then_read_yields_session() {
        let store = store(Arc::new(MemoryStorage::new()));
        store.login("T", Role::User).unwrap();
        assert_eq!(store.current(), Session::signed_in("T", Role::User));
        assert!(!store.current().is_admin());
    }

    #[test]
    fn logout_clears_token_and_role() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemoryStorage::new());
        let store = store(storage.clone());
        store.login("T", Role::Admin).unwrap();
        store.logout();

        assert_eq!(store.current(), Session::default());
        assert!(storage.get(TOKEN_KEY).is_none());
        assert!(storage.get(ROLE_KEY).is_none());
    }

    #[test]
    fn reload_restores_last_committed_session() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");

        let first = store(Arc::new(FileStorage::new(&path)));
        first.login("one", Role::User).unwrap();
        first.login("two", Role::Admin).unwrap();

        let reloaded = store(Arc::new(FileStorage::new(&path)));
        assert_eq!(reloaded.current(), Session::signed_in("two", Role::Admin));
    }

    #[test]
    fn reload_after_logout_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");

        let first = store(Arc::new(FileStorage::new(&path)));
        first.login("T", Role::User).unwrap();
        first.logout();

        let reloaded = store(Arc::new(FileStorage::new(&path)));
        assert!(!reloaded.current().is_authenticated());
    }

    #[test]
    fn token_without_role_is_discarded() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "orphan").unwrap();

        let store = store(storage.clone());
        assert_eq!(store.current(), Session::default());
        assert!(storage.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn unknown_role_is_discarded() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "T").unwrap();
        storage.set(ROLE_KEY, "superuser").unwrap();

        assert!(!store(storage).current().is_authenticated());
    }

    #[test]
    fn login_and_logout_notify() {
        let notices = NotificationCenter::default();
        let store = SessionStore::load(Arc::new(MemoryStorage::new()), notices.clone());
        store.login("T", Role::User).unwrap();
        store.logout();

        let messages: Vec<String> = notices.visible().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec!["Logged in successfully!", "Logged out successfully!"]
        );
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let store = store(Arc::new(MemoryStorage::new()));
        let mut rx = store.subscribe();
        store.login("T", Role::User).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().token.as_deref(), Some("T"));
    }
}
