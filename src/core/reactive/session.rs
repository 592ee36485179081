//! Signed-in session

use super::container::{PersistedRecord, ReactiveStore};
use crate::adapters::storage::StateStorage;
use crate::domain::{HospitalId, User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Who is signed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Account id
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email
    pub email: String,
    /// Role name
    pub role: String,
    /// Hospital the account belongs to, absent for super admins
    pub hospital_id: Option<HospitalId>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            hospital_id: user.hospital_id.clone(),
        }
    }
}

/// Persisted session record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Signed-in account, if any
    pub user: Option<SessionUser>,
    /// When the current session started
    pub signed_in_at: Option<DateTime<Utc>>,
}

impl PersistedRecord for SessionState {
    const KEY: &'static str = "session";
}

/// Reactive session
pub struct SessionStore {
    inner: ReactiveStore<SessionState>,
}

impl SessionStore {
    /// Loads the persisted session
    pub fn load(storage: Arc<dyn StateStorage>, namespace: &str) -> Self {
        Self {
            inner: ReactiveStore::load(storage, namespace),
        }
    }

    /// Starts a session, replacing any current one
    pub fn sign_in(&self, user: SessionUser) {
        tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
        self.inner.set(SessionState {
            user: Some(user),
            signed_in_at: Some(Utc::now()),
        });
    }

    /// Ends the session
    pub fn sign_out(&self) {
        self.inner.reset();
        tracing::info!("Signed out");
    }

    /// Signed-in account, if any
    pub fn current_user(&self) -> Option<SessionUser> {
        self.inner.read(|s| s.user.clone())
    }

    /// Whether anyone is signed in
    pub fn is_signed_in(&self) -> bool {
        self.inner.read(|s| s.user.is_some())
    }

    /// Clone of the whole session record
    pub fn get(&self) -> SessionState {
        self.inner.get()
    }

    /// Receiver that observes every change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.subscribe()
    }
}
