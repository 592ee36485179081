//! Reactive client-state stores
//!
//! Each store owns one record with a process-wide lifecycle: it is rehydrated from
//! [`StateStorage`] on load, changed only by explicit actions, broadcast to subscribers on
//! every change, and destroyed only by an explicit reset.
//!
//! | Store | Key | Default |
//! |---|---|---|
//! | [`NotificationStore`] | `notifications` | empty feed |
//! | [`ThemeStore`] | `theme` | light |
//! | [`TwoFactorStore`] | `two-factor` | disabled |
//! | [`ProfileStore`] | `profile` | empty profile |
//! | [`SessionStore`] | `session` | signed out |
//!
//! Stores never reach into each other. [`ClientState`] only bundles them; keeping them
//! consistent (say, clearing 2FA on sign-out) is up to the caller.

pub mod container;
pub mod notifications;
pub mod profile;
pub mod session;
pub mod theme;
pub mod two_factor;

pub use container::{storage_key, PersistedRecord, ReactiveStore};
pub use notifications::{NotificationFeed, NotificationStore};
pub use profile::{Profile, ProfilePatch, ProfileStore};
pub use session::{SessionState, SessionStore, SessionUser};
pub use theme::{DocumentRoot, ThemeMode, ThemeState, ThemeStore, ThemeTarget};
pub use two_factor::{
    generate_backup_codes, generate_secret, TwoFactorMethod, TwoFactorState, TwoFactorStore,
};

use crate::adapters::storage::StateStorage;
use std::sync::Arc;

/// Every client-state store, loaded from one storage backend
pub struct ClientState {
    /// Notification feed
    pub notifications: Arc<NotificationStore>,
    /// UI theme
    pub theme: ThemeStore,
    /// Two-factor settings
    pub two_factor: TwoFactorStore,
    /// Administrator profile
    pub profile: ProfileStore,
    /// Signed-in session
    pub session: SessionStore,
}

impl ClientState {
    /// Loads every store under `namespace`
    pub fn load(
        storage: Arc<dyn StateStorage>,
        namespace: &str,
        max_notifications: usize,
        theme_target: Arc<dyn ThemeTarget>,
    ) -> Self {
        tracing::debug!(
            backend = storage.backend_name(),
            namespace,
            "Loading client state"
        );
        Self {
            notifications: Arc::new(NotificationStore::load(
                storage.clone(),
                namespace,
                max_notifications,
            )),
            theme: ThemeStore::load(storage.clone(), namespace, theme_target),
            two_factor: TwoFactorStore::load(storage.clone(), namespace),
            profile: ProfileStore::load(storage.clone(), namespace),
            session: SessionStore::load(storage, namespace),
        }
    }

    /// Resets every store to its default
    pub fn reset_all(&self) {
        self.notifications.clear();
        self.theme.reset();
        self.two_factor.reset();
        self.profile.reset();
        self.session.sign_out();
    }
}
