//! Admin panel and profile editing against a live mock backend.

mod common;

use std::time::Duration;

use common::{user_json, Backend, Data};
use creator_dashboard::api::models::{ObjectId, Role};
use creator_dashboard::screens::admin::{AdminPanel, NEGATIVE_CREDITS, NO_FEED_ACTIVITY, NO_USERS};
use creator_dashboard::screens::dashboard::{Dashboard, DashboardResource};
use creator_dashboard::screens::profile::{ProfileScreen, FIX_ERRORS, NAME_TOO_LONG};
use creator_dashboard::screens::remote::{Listing, Outcome};
use creator_dashboard::state::ScreenContext;
use serde_json::json;

async fn panel(ctx: &ScreenContext) -> AdminPanel {
    let mut panel = AdminPanel::new();
    panel.mount(ctx).await;
    panel.settled().await;
    panel
}

fn one_user() -> Data {
    Data {
        users: vec![user_json("u1", "a@example.com", 10)],
        ..Default::default()
    }
}

#[tokio::test]
async fn empty_admin_lists_show_explicit_states() {
    let backend = Backend::start(Data::default()).await;
    let state = backend.signed_in(Role::Admin);
    let panel = panel(&state.screen_context()).await;

    assert_eq!(panel.users().await, Listing::Empty(NO_USERS));
    assert_eq!(panel.feed_activity().await, Listing::Empty(NO_FEED_ACTIVITY));
}

#[tokio::test]
async fn credit_update_replaces_the_record() {
    let backend = Backend::start(one_user()).await;
    let state = backend.signed_in(Role::Admin);
    let ctx = state.screen_context();
    let panel = panel(&ctx).await;
    let id = ObjectId::from("u1");

    assert_eq!(panel.update_credits(&ctx, &id, 40).await, Outcome::Applied);

    let Listing::Items(users) = panel.users().await else {
        panic!("expected users");
    };
    assert_eq!(users[0].credits, 40);
    assert_eq!(users[0].email, "a@example.com");
    assert!(!panel.is_updating(&id));
    let notices = state.notices.visible();
    assert_eq!(notices[0].message, "Credits updated successfully!");
}

#[tokio::test]
async fn concurrent_credit_updates_issue_one_request() {
    let backend = Backend::start(Data {
        credits_delay: Duration::from_millis(100),
        ..one_user()
    })
    .await;
    let state = backend.signed_in(Role::Admin);
    let ctx = state.screen_context();
    let panel = panel(&ctx).await;
    let id = ObjectId::from("u1");

    let (first, second) = tokio::join!(
        panel.update_credits(&ctx, &id, 40),
        panel.update_credits(&ctx, &id, 50)
    );

    assert_eq!(first, Outcome::Applied);
    assert_eq!(second, Outcome::Skipped);
    assert_eq!(backend.mock.hits("update_credits"), 1);
    let Listing::Items(users) = panel.users().await else {
        panic!("expected users");
    };
    assert_eq!(users[0].credits, 40);
}

#[tokio::test]
async fn negative_credits_are_rejected_locally() {
    let backend = Backend::start(one_user()).await;
    let state = backend.signed_in(Role::Admin);
    let ctx = state.screen_context();
    let panel = panel(&ctx).await;

    let outcome = panel.update_credits(&ctx, &ObjectId::from("u1"), -1).await;
    assert_eq!(outcome, Outcome::Invalid(NEGATIVE_CREDITS.to_string()));
    assert_eq!(backend.mock.hits("update_credits"), 0);
}

#[tokio::test]
async fn overlong_name_never_reaches_the_backend() {
    let backend = Backend::start(Data::default()).await;
    let state = backend.signed_in(Role::User);
    let ctx = state.screen_context();
    let dashboard = Dashboard::new(DashboardResource);

    let mut screen = ProfileScreen::new(dashboard.handle());
    screen.mount(&ctx).await;
    screen.settled().await;
    screen.open_editor().await;
    screen.set_name("n".repeat(51));

    assert_eq!(
        screen.submit(&ctx).await,
        Outcome::Invalid(FIX_ERRORS.to_string())
    );
    let editor = screen.editor().unwrap();
    assert_eq!(editor.errors.name.as_deref(), Some(NAME_TOO_LONG));
    assert_eq!(backend.mock.hits("update_profile"), 0);
    assert_eq!(state.notices.visible()[0].message, FIX_ERRORS);
}

#[tokio::test]
async fn valid_profile_edit_commits_and_updates_credits() {
    let backend = Backend::start(Data {
        credits: 10,
        profile: json!({ "name": "Ann", "bio": "", "avatar": "" }),
        ..Default::default()
    })
    .await;
    let state = backend.signed_in(Role::User);
    let ctx = state.screen_context();
    let mut dashboard = Dashboard::new(DashboardResource);
    dashboard.mount(&ctx).await;
    dashboard.settled().await;

    let mut screen = ProfileScreen::new(dashboard.handle());
    screen.mount(&ctx).await;
    screen.settled().await;
    assert_eq!(screen.profile().await.name, "Ann");
    assert_eq!(screen.completion().await, 33);

    screen.open_editor().await;
    screen.set_bio("Writes about Rust");
    screen.set_avatar("https://cdn.example.com/me.png");
    assert_eq!(screen.submit(&ctx).await, Outcome::Applied);

    assert!(screen.editor().is_none());
    let profile = screen.profile().await;
    assert_eq!(profile.name, "Ann");
    assert_eq!(profile.bio, "Writes about Rust");
    assert_eq!(screen.completion().await, 100);
    assert_eq!(dashboard.snapshot().await.credits, 20);
    assert!(state
        .notices
        .visible()
        .iter()
        .any(|n| n.message == "Profile updated successfully! Check your credits."));
}
