use async_trait::async_trait;

use crate::api::models::Profile;
use crate::api::ApiClient;
use crate::error::{AppResult, FailureText};
use crate::screens::dashboard::DashboardData;
use crate::screens::merge::Merge;
use crate::screens::remote::{Outcome, RemoteResource, RemoteView, ViewHandle};
use crate::state::ScreenContext;

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_BIO_CHARS: usize = 200;

pub const NAME_TOO_LONG: &str = "Name must be 50 characters or less";
pub const BIO_TOO_LONG: &str = "Bio must be 200 characters or less";
pub const INVALID_AVATAR: &str =
    "Please enter a valid image URL (jpg, png, gif, webp) or base64 image";
pub const BROKEN_AVATAR: &str = "Invalid image";
pub const FIX_ERRORS: &str = "Please fix the errors before submitting.";

const URL_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
const INLINE_TYPES: [&str; 4] = ["jpeg", "png", "gif", "webp"];

const UPDATE_FAILURE: FailureText = FailureText::new("updating profile");

/// An http(s) URL ending in an image extension (any case), or an inline
/// base64 image. Empty means "no avatar" and is accepted.
pub fn is_valid_avatar(avatar: &str) -> bool {
    avatar.is_empty() || is_image_url(avatar) || is_inline_image(avatar)
}

fn is_image_url(avatar: &str) -> bool {
    if avatar.contains(['\n', '\r']) {
        return false;
    }
    let lower = avatar.to_ascii_lowercase();
    let Some(rest) = lower
        .strip_prefix("http://")
        .or_else(|| lower.strip_prefix("https://"))
    else {
        return false;
    };
    URL_EXTENSIONS
        .iter()
        .any(|ext| rest.ends_with(&format!(".{}", ext)))
}

fn is_inline_image(avatar: &str) -> bool {
    INLINE_TYPES
        .iter()
        .any(|kind| avatar.starts_with(&format!("data:image/{};base64,", kind)))
}

/// Per-field validation messages; `None` means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.avatar.is_none()
    }
}

pub fn validate(profile: &Profile) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if profile.name.chars().count() > MAX_NAME_CHARS {
        errors.name = Some(NAME_TOO_LONG.to_string());
    }
    if profile.bio.chars().count() > MAX_BIO_CHARS {
        errors.bio = Some(BIO_TOO_LONG.to_string());
    }
    if !is_valid_avatar(&profile.avatar) {
        errors.avatar = Some(INVALID_AVATAR.to_string());
    }
    errors
}

/// Staging copy edited in isolation from the committed profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEditor {
    pub draft: Profile,
    pub errors: FieldErrors,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileResource;

#[async_trait]
impl RemoteResource for ProfileResource {
    type Data = Profile;

    fn failure_text(&self) -> FailureText {
        FailureText::new("fetching profile")
    }

    async fn fetch(&self, api: &ApiClient, token: &str) -> AppResult<Profile> {
        Ok(api.profile(token).await?.profile.unwrap_or_default())
    }
}

pub struct ProfileScreen {
    view: RemoteView<ProfileResource>,
    dashboard: ViewHandle<DashboardData>,
    editor: Option<ProfileEditor>,
    avatar_broken: bool,
}

impl ProfileScreen {
    pub fn new(dashboard: ViewHandle<DashboardData>) -> Self {
        Self {
            view: RemoteView::new(ProfileResource),
            dashboard,
            editor: None,
            avatar_broken: false,
        }
    }

    pub async fn mount(&mut self, ctx: &ScreenContext) {
        self.view.mount(ctx).await;
    }

    pub async fn settled(&mut self) {
        self.view.settled().await;
    }

    pub async fn unmount(&mut self) {
        self.view.unmount().await;
    }

    pub async fn is_loading(&self) -> bool {
        self.view.is_loading().await
    }

    /// The committed profile.
    pub async fn profile(&self) -> Profile {
        self.view.snapshot().await
    }

    pub fn editor(&self) -> Option<&ProfileEditor> {
        self.editor.as_ref()
    }

    /// Percentage of filled fields; a broken avatar does not count.
    pub async fn completion(&self) -> u8 {
        let profile = self.profile().await;
        let filled = [
            !profile.name.is_empty(),
            !profile.bio.is_empty(),
            !profile.avatar.is_empty() && !self.avatar_broken,
        ]
        .into_iter()
        .filter(|filled| *filled)
        .count();
        (filled as f64 * 33.33).round() as u8
    }

    /// Start editing from the committed profile, discarding old errors.
    pub async fn open_editor(&mut self) {
        self.avatar_broken = false;
        self.editor = Some(ProfileEditor {
            draft: self.profile().await,
            errors: FieldErrors::default(),
        });
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if let Some(editor) = self.editor.as_mut() {
            editor.draft.name = name.into();
            editor.errors.name = None;
        }
    }

    pub fn set_bio(&mut self, bio: impl Into<String>) {
        if let Some(editor) = self.editor.as_mut() {
            editor.draft.bio = bio.into();
            editor.errors.bio = None;
        }
    }

    pub fn set_avatar(&mut self, avatar: impl Into<String>) {
        if let Some(editor) = self.editor.as_mut() {
            editor.draft.avatar = avatar.into();
            editor.errors.avatar = None;
            self.avatar_broken = false;
        }
    }

    /// The avatar image failed to load.
    pub fn mark_avatar_broken(&mut self) {
        self.avatar_broken = true;
        if let Some(editor) = self.editor.as_mut() {
            editor.errors.avatar = Some(BROKEN_AVATAR.to_string());
        }
    }

    /// Close the editor; the committed profile is untouched.
    pub fn cancel(&mut self) {
        self.editor = None;
    }

    /// Validate the draft and, if valid, commit it through the backend.
    pub async fn submit(&mut self, ctx: &ScreenContext) -> Outcome {
        let Some(editor) = self.editor.as_mut() else {
            return Outcome::Skipped;
        };

        editor.errors = validate(&editor.draft);
        if !editor.errors.is_empty() {
            ctx.notices.error(FIX_ERRORS);
            return Outcome::Invalid(FIX_ERRORS.to_string());
        }
        let draft = editor.draft.clone();

        let Ok(token) = ctx.require_token() else {
            return Outcome::Failed;
        };

        match ctx.api.update_profile(token, &draft).await {
            Ok(res) => {
                let user = res.user;
                self.view
                    .handle()
                    .update(|committed| committed.merge(user.profile))
                    .await;
                self.dashboard.update(|d| d.credits = user.credits).await;
                self.editor = None;
                ctx.notices
                    .success("Profile updated successfully! Check your credits.");
                Outcome::Applied
            }
            Err(e) => {
                ctx.report(&e, &UPDATE_FAILURE);
                Outcome::Failed
            }
        }
    }
}
