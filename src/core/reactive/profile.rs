//! Profile of the signed-in administrator

use super::container::{PersistedRecord, ReactiveStore};
use crate::adapters::storage::StateStorage;
use crate::domain::patch::double_option;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Persisted profile record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Avatar image URL or data URI
    pub avatar: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Job title
    pub title: Option<String>,
}

impl PersistedRecord for Profile {
    const KEY: &'static str = "profile";
}

/// Partial profile update; `null` clears an optional field
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,

    /// New email
    #[serde(default)]
    pub email: Option<String>,

    /// New avatar, or `null` to remove it
    #[serde(default, deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,

    /// New phone, or `null` to remove it
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,

    /// New title, or `null` to remove it
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
}

impl Profile {
    /// Merges the supplied fields
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
    }
}

/// Reactive profile
pub struct ProfileStore {
    inner: ReactiveStore<Profile>,
}

impl ProfileStore {
    /// Loads the persisted profile
    pub fn load(storage: Arc<dyn StateStorage>, namespace: &str) -> Self {
        Self {
            inner: ReactiveStore::load(storage, namespace),
        }
    }

    /// Clone of the current profile
    pub fn get(&self) -> Profile {
        self.inner.get()
    }

    /// Replaces the whole profile
    pub fn set(&self, profile: Profile) {
        self.inner.set(profile);
    }

    /// Merges `patch` and returns the result
    pub fn update(&self, patch: ProfilePatch) -> Profile {
        self.inner.update(|profile| {
            profile.apply(patch);
            profile.clone()
        })
    }

    /// Clears the profile
    pub fn reset(&self) {
        self.inner.reset();
    }

    /// Receiver that observes every change
    pub fn subscribe(&self) -> watch::Receiver<Profile> {
        self.inner.subscribe()
    }
}
