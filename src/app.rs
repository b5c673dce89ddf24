//! Runs one CLI command through the route guard and the screens, returning
//! the rendered view.

use crate::api::models::{ObjectId, Role};
use crate::config::Command;
use crate::render;
use crate::routes::{DashboardView, Route, Shell};
use crate::screens::admin::AdminPanel;
use crate::screens::auth::AuthForm;
use crate::screens::dashboard::{Dashboard, DashboardResource};
use crate::screens::feed::FeedScreen;
use crate::screens::profile::ProfileScreen;
use crate::screens::remote::Outcome;
use crate::screens::saved::{SavedPosts, SavedPostsResource};
use crate::state::{AppState, ScreenContext};

/// Dashboard view a command opens; `None` for the login screen commands.
pub fn target_view(command: &Command) -> Option<DashboardView> {
    match command {
        Command::Login { .. } | Command::Register { .. } | Command::Logout => None,
        Command::Home => Some(DashboardView::Home),
        Command::Feed | Command::Save { .. } | Command::Report { .. } | Command::Share { .. } => {
            Some(DashboardView::Feed)
        }
        Command::Saved => Some(DashboardView::Saved),
        Command::Profile | Command::ProfileEdit { .. } => Some(DashboardView::Profile),
        Command::Admin | Command::AdminCredits { .. } => Some(DashboardView::Admin),
    }
}

pub async fn run(state: &AppState, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Login { email, password } => {
            let mut form = AuthForm::new();
            form.submit(state, &email, &password, Role::User).await;
            Ok(landing(state))
        }
        Command::Register {
            email,
            password,
            role,
        } => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            let mut form = AuthForm::new();
            form.toggle_mode();
            form.submit(state, &email, &password, role).await;
            Ok(landing(state))
        }
        Command::Logout => {
            if state.session.current().is_authenticated() {
                state.session.logout();
            }
            Ok(landing(state))
        }
        command => match target_view(&command) {
            Some(view) => open(state, view, command).await,
            None => Ok(landing(state)),
        },
    }
}

fn landing(state: &AppState) -> String {
    let shell = Shell::new(&state.session.current());
    format!("Now at {}", shell.current().path())
}

async fn open(state: &AppState, view: DashboardView, command: Command) -> anyhow::Result<String> {
    let session = state.session.current();
    let mut shell = Shell::new(&session);
    shell.navigate(&Route::Dashboard(view).path(), &session);
    if shell.current() != Route::Dashboard(view) {
        return Ok(format!("Redirected to {}", shell.current().path()));
    }

    let ctx = state.screen_context();
    let mut dashboard = Dashboard::new(DashboardResource);
    dashboard.mount(&ctx).await;
    dashboard.settled().await;
    if shell.sync(&state.session.current()) {
        return Ok(format!("Session ended. Redirected to {}", shell.current().path()));
    }

    let body = screen(&ctx, &dashboard, command).await;

    if shell.sync(&state.session.current()) {
        return Ok(format!(
            "{}\nSession ended. Redirected to {}",
            body,
            shell.current().path()
        ));
    }
    let credits = dashboard.handle().read(|d| d.credits).await;
    let nav = render::navigation(&DashboardView::navigation(&session), view, credits);
    Ok(format!("{}\n\n{}", nav, body))
}

async fn screen(ctx: &ScreenContext, dashboard: &Dashboard, command: Command) -> String {
    match command {
        Command::Home => {
            let mut saved = SavedPosts::new(SavedPostsResource::new(dashboard.handle()));
            saved.mount(ctx).await;
            saved.settled().await;
            let data = dashboard.snapshot().await;
            render::home(data.credits, &data.activities, &saved.listing().await)
        }
        Command::Saved => {
            let mut saved = SavedPosts::new(SavedPostsResource::new(dashboard.handle()));
            saved.mount(ctx).await;
            saved.settled().await;
            render::saved_posts(&saved.listing().await)
        }
        Command::Feed => {
            let screen = mounted_feed(ctx, dashboard).await;
            feed(&screen, dashboard).await
        }
        Command::Save { id } => {
            let screen = mounted_feed(ctx, dashboard).await;
            let outcome = screen.save(ctx, &ObjectId::new(id)).await;
            with_note(outcome, "Post already saved.", feed(&screen, dashboard).await)
        }
        Command::Report { id } => {
            let screen = mounted_feed(ctx, dashboard).await;
            let outcome = screen.report(ctx, &ObjectId::new(id)).await;
            with_note(outcome, "Post already reported.", feed(&screen, dashboard).await)
        }
        Command::Share { id } => {
            let screen = mounted_feed(ctx, dashboard).await;
            screen
                .share(ctx, &ObjectId::new(id))
                .await
                .unwrap_or_default()
        }
        Command::Profile => {
            let mut screen = ProfileScreen::new(dashboard.handle());
            screen.mount(ctx).await;
            screen.settled().await;
            render::profile(&screen.profile().await, screen.completion().await)
        }
        Command::ProfileEdit { name, bio, avatar } => {
            let mut screen = ProfileScreen::new(dashboard.handle());
            screen.mount(ctx).await;
            screen.settled().await;
            screen.open_editor().await;
            if let Some(name) = name {
                screen.set_name(name);
            }
            if let Some(bio) = bio {
                screen.set_bio(bio);
            }
            if let Some(avatar) = avatar {
                screen.set_avatar(avatar);
            }
            match screen.submit(ctx).await {
                Outcome::Invalid(message) => {
                    let errors = screen
                        .editor()
                        .map(|e| render::field_errors(&e.errors))
                        .unwrap_or_default();
                    format!("{}\n{}", message, errors)
                }
                _ => render::profile(&screen.profile().await, screen.completion().await),
            }
        }
        Command::Admin => {
            let mut panel = AdminPanel::new();
            panel.mount(ctx).await;
            panel.settled().await;
            admin(&panel).await
        }
        Command::AdminCredits { user, credits } => {
            let mut panel = AdminPanel::new();
            panel.mount(ctx).await;
            panel.settled().await;
            let outcome = panel
                .update_credits(ctx, &ObjectId::new(user), credits)
                .await;
            match outcome {
                Outcome::Invalid(message) => format!("{}\n{}", message, admin(&panel).await),
                _ => admin(&panel).await,
            }
        }
        Command::Login { .. } | Command::Register { .. } | Command::Logout => String::new(),
    }
}

async fn mounted_feed(ctx: &ScreenContext, dashboard: &Dashboard) -> FeedScreen {
    let mut screen = FeedScreen::new(dashboard.handle());
    screen.mount(ctx).await;
    screen.settled().await;
    screen
}

async fn feed(screen: &FeedScreen, dashboard: &Dashboard) -> String {
    let saved = dashboard.handle().read(|d| d.saved_posts.clone()).await;
    render::feed(&screen.posts().await, &saved)
}

/// Disabled actions are silent in the feed; say why on the command line.
fn with_note(outcome: Outcome, note: &str, view: String) -> String {
    match outcome {
        Outcome::Skipped => format!("{}\n{}", note, view),
        _ => view,
    }
}

async fn admin(panel: &AdminPanel) -> String {
    format!(
        "{}\n{}",
        render::users(&panel.users().await),
        render::feed_activity(&panel.feed_activity().await, panel.expanded())
    )
}
