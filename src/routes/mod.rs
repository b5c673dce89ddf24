//! Navigation guard and dashboard sub-view selection.
//!
//! Two top-level states keyed solely on token presence: unauthenticated
//! sessions always land on `/login`, authenticated ones on the dashboard.

use crate::auth::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardView {
    Home,
    Profile,
    Feed,
    Saved,
    Admin,
}

impl DashboardView {
    pub const ALL: [DashboardView; 5] = [
        DashboardView::Home,
        DashboardView::Profile,
        DashboardView::Feed,
        DashboardView::Saved,
        DashboardView::Admin,
    ];

    pub fn segment(self) -> &'static str {
        match self {
            DashboardView::Home => "home",
            DashboardView::Profile => "profile",
            DashboardView::Feed => "feed",
            DashboardView::Saved => "saved",
            DashboardView::Admin => "admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardView::Home => "Home",
            DashboardView::Profile => "Profile",
            DashboardView::Feed => "Feed",
            DashboardView::Saved => "Saved Posts",
            DashboardView::Admin => "Admin Panel",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.segment() == segment)
    }

    /// Sidebar entries for a session; the admin panel only for admins.
    pub fn navigation(session: &Session) -> Vec<DashboardView> {
        Self::ALL
            .into_iter()
            .filter(|v| *v != DashboardView::Admin || session.is_admin())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard(DashboardView),
}

impl Route {
    pub fn path(self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard(view) => format!("/dashboard/{}", view.segment()),
        }
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, Route::Dashboard(_))
    }
}

/// Resolve a requested path for `session`, following every redirect.
pub fn resolve(path: &str, session: &Session) -> Route {
    if !session.is_authenticated() {
        return Route::Login;
    }

    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let home = Route::Dashboard(DashboardView::Home);

    match segments.as_slice() {
        ["dashboard", sub, ..] => match DashboardView::from_segment(sub) {
            Some(DashboardView::Admin) if !session.is_admin() => home,
            Some(view) => Route::Dashboard(view),
            None => home,
        },
        _ => home,
    }
}

/// Current route, kept consistent with the session.
#[derive(Debug, Clone)]
pub struct Shell {
    current: Route,
}

impl Shell {
    pub fn new(session: &Session) -> Self {
        Self {
            current: resolve("/", session),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Go to `path`. Returns false when the resolved route is the current
    /// one, in which case nothing changes.
    pub fn navigate(&mut self, path: &str, session: &Session) -> bool {
        let next = resolve(path, session);
        if next == self.current {
            return false;
        }
        tracing::debug!("Route {} -> {}", self.current.path(), next.path());
        self.current = next;
        true
    }

    /// Re-apply the guard after login or logout.
    pub fn sync(&mut self, session: &Session) -> bool {
        let path = self.current.path();
        self.navigate(&path, session)
    }
}
