//! Plain-text rendering of the dashboard views.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::api::models::{ActivityEntry, AdminUserRecord, FeedActivityRecord, ObjectId, Post, Profile};
use crate::notifications::Notification;
use crate::routes::DashboardView;
use crate::screens::profile::FieldErrors;
use crate::screens::remote::Listing;

const LOADING: &str = "Loading...";

/// `save_post` -> `save post`; only the first underscore is replaced.
pub fn activity_label(action: &str) -> String {
    action.replacen('_', " ", 1)
}

fn date(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn notification(notice: &Notification) -> String {
    format!("{} {}", notice.kind.icon(), notice.message)
}

pub fn navigation(views: &[DashboardView], current: DashboardView, credits: i64) -> String {
    let mut out = String::new();
    for view in views {
        let marker = if *view == current { "*" } else { " " };
        let _ = write!(out, "[{}{}] ", marker, view.label());
    }
    let _ = write!(out, "| Credits: {}", credits);
    out
}

pub fn activities(entries: &[ActivityEntry]) -> String {
    let mut out = String::from("Recent Activity\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "  > {}: {} - {}",
            activity_label(&entry.action),
            entry.details,
            date(entry.at())
        );
    }
    out
}

pub fn home(credits: i64, entries: &[ActivityEntry], saved: &Listing<Post>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Your Credits: {}", credits);
    out.push_str(&activities(entries));
    out.push_str(&saved_posts(saved));
    out
}

pub fn feed(listing: &Listing<Post>, saved: &[ObjectId]) -> String {
    let mut out = String::from("Social Feed\n");
    match listing {
        Listing::Loading => out.push_str(LOADING),
        Listing::Empty(text) => out.push_str(text),
        Listing::Items(posts) => {
            for post in posts {
                let mut flags = Vec::new();
                if post.saved || saved.contains(&post.id) {
                    flags.push("saved");
                }
                if post.reported {
                    flags.push("reported");
                }
                let _ = writeln!(out, "[{}] {}", post.id, post.content);
                let _ = writeln!(
                    out,
                    "    Source: {} | Author: {} | {}{}",
                    post.source,
                    post.author,
                    date(post.created_at),
                    if flags.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", flags.join(", "))
                    }
                );
            }
        }
    }
    out
}

pub fn saved_posts(listing: &Listing<Post>) -> String {
    let mut out = String::new();
    match listing {
        Listing::Loading => {
            let _ = writeln!(out, "Saved Posts\n{}", LOADING);
        }
        Listing::Empty(text) => {
            let _ = writeln!(out, "Saved Posts (0)\n{}", text);
        }
        Listing::Items(posts) => {
            let _ = writeln!(out, "Saved Posts ({})", posts.len());
            for post in posts {
                let _ = writeln!(
                    out,
                    "  {}\n    Source: {} | Author: {}",
                    post.content, post.source, post.author
                );
            }
        }
    }
    out
}

pub fn profile(profile: &Profile, completion: u8) -> String {
    let or_dash = |s: &str| {
        if s.is_empty() {
            "-".to_string()
        } else {
            s.to_string()
        }
    };
    format!(
        "Profile ({}% Complete)\n  Name:   {}\n  Bio:    {}\n  Avatar: {}\n",
        completion,
        or_dash(&profile.name),
        or_dash(&profile.bio),
        or_dash(&profile.avatar)
    )
}

pub fn field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, error) in [
        ("name", &errors.name),
        ("bio", &errors.bio),
        ("avatar", &errors.avatar),
    ] {
        if let Some(error) = error {
            let _ = writeln!(out, "  {}: {}", field, error);
        }
    }
    out
}

pub fn users(listing: &Listing<AdminUserRecord>) -> String {
    let mut out = String::new();
    match listing {
        Listing::Loading => out.push_str(LOADING),
        Listing::Empty(text) => {
            let _ = writeln!(out, "User Analytics (0)\n{}", text);
        }
        Listing::Items(users) => {
            let _ = writeln!(out, "User Analytics ({})", users.len());
            for user in users {
                let _ = writeln!(
                    out,
                    "  [{}] {} | Role: {} | Credits: {}",
                    user.id, user.email, user.role, user.credits
                );
            }
        }
    }
    out
}

pub fn feed_activity(listing: &Listing<FeedActivityRecord>, expanded: Option<&ObjectId>) -> String {
    let mut out = String::new();
    match listing {
        Listing::Loading => out.push_str(LOADING),
        Listing::Empty(text) => {
            let _ = writeln!(out, "Feed Activity (0)\n{}", text);
        }
        Listing::Items(records) => {
            let _ = writeln!(out, "Feed Activity ({})", records.len());
            for record in records {
                let email = record.user.as_ref().map_or("-", |u| u.email.as_str());
                let _ = writeln!(
                    out,
                    "  {} | {} | {}",
                    email,
                    activity_label(&record.action).to_lowercase(),
                    date(record.created_at)
                );
                if expanded == Some(&record.id) {
                    let _ = writeln!(out, "      {}", record.details);
                }
            }
        }
    }
    out
}
