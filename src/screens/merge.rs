//! Local merges applied after a successful write.
//!
//! Screens never refetch after a write. The response (or the fact of
//! success) is folded into the local copy instead, with last-write-wins: every
//! field a patch carries overwrites the current value, so when two writes race
//! the one whose response is applied last decides the field.

use crate::api::models::{AdminUserRecord, FeedActivityRecord, ObjectId, Post, Profile};

pub trait Merge<P> {
    fn merge(&mut self, patch: P);
}

/// Items addressable by backend id.
pub trait Keyed {
    fn key(&self) -> &ObjectId;
}

impl Keyed for Post {
    fn key(&self) -> &ObjectId {
        &self.id
    }
}

impl Keyed for AdminUserRecord {
    fn key(&self) -> &ObjectId {
        &self.id
    }
}

impl Keyed for FeedActivityRecord {
    fn key(&self) -> &ObjectId {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub saved: Option<bool>,
    pub reported: Option<bool>,
}

impl PostPatch {
    pub fn saved() -> Self {
        Self {
            saved: Some(true),
            ..Self::default()
        }
    }

    pub fn reported() -> Self {
        Self {
            reported: Some(true),
            ..Self::default()
        }
    }
}

impl Merge<PostPatch> for Post {
    fn merge(&mut self, patch: PostPatch) {
        if let Some(saved) = patch.saved {
            self.saved = saved;
        }
        if let Some(reported) = patch.reported {
            self.reported = reported;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditsPatch(pub i64);

impl Merge<CreditsPatch> for AdminUserRecord {
    fn merge(&mut self, patch: CreditsPatch) {
        self.credits = patch.0;
    }
}

impl Merge<Profile> for Profile {
    fn merge(&mut self, patch: Profile) {
        *self = patch;
    }
}

/// Apply `patch` to the item with `id`. Returns false when no item matches.
pub fn merge_by_id<T, P>(items: &mut [T], id: &ObjectId, patch: P) -> bool
where
    T: Keyed + Merge<P>,
{
    match items.iter_mut().find(|item| item.key() == id) {
        Some(item) => {
            item.merge(patch);
            true
        }
        None => false,
    }
}
