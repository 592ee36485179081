//! Console wiring
//!
//! [`Console`] is what an administrator session runs against: one [`MockApi`] whose derived
//! notifications land in the [`ClientState`] feed, plus the document root the theme store
//! paints. It is also the one place that coordinates across stores.

use crate::adapters::storage::{create_state_storage, StateStorage};
use crate::config::WardroomConfig;
use crate::core::api::MockApi;
use crate::core::reactive::{
    generate_backup_codes, generate_secret, ClientState, DocumentRoot, ProfilePatch, SessionUser,
    TwoFactorMethod,
};
use crate::core::store::ListQuery;
use crate::domain::{NotificationEvent, NotificationType, Result, WardroomError};
use serde_json::json;
use std::sync::Arc;

/// Number of recovery codes issued when two-factor is enabled
pub const BACKUP_CODE_COUNT: usize = 8;

/// Secrets handed to the administrator once, when two-factor is turned on
#[derive(Debug, Clone)]
pub struct TwoFactorEnrollment {
    /// Authenticator secret (base32)
    pub secret: String,
    /// Single-use recovery codes
    pub backup_codes: Vec<String>,
}

/// A running console: API facade plus client state
pub struct Console {
    api: MockApi,
    state: ClientState,
    document: Arc<DocumentRoot>,
}

impl Console {
    /// Builds storage, client state and API from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be opened or demo data cannot be seeded.
    pub fn from_config(config: &WardroomConfig) -> Result<Self> {
        let storage = create_state_storage(&config.storage)?;
        Self::with_storage(config, storage)
    }

    /// Like [`Console::from_config`] but with an explicit storage backend
    pub fn with_storage(config: &WardroomConfig, storage: Arc<dyn StateStorage>) -> Result<Self> {
        let document = Arc::new(DocumentRoot::new());
        let state = ClientState::load(
            storage,
            &config.storage.namespace,
            config.notifications.max_entries,
            document.clone(),
        );
        let api =
            MockApi::from_config(&config.api)?.with_notifications(state.notifications.clone());

        tracing::info!(
            base_path = %api.router().base_path(),
            theme = %state.theme.mode(),
            signed_in = state.session.is_signed_in(),
            "Console ready"
        );

        Ok(Self {
            api,
            state,
            document,
        })
    }

    /// API facade
    pub fn api(&self) -> &MockApi {
        &self.api
    }

    /// Client-state stores
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Element the theme is applied to
    pub fn document(&self) -> &DocumentRoot {
        &self.document
    }

    /// Signs in the user with `email` and fills a blank profile from the account
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no user has that email.
    pub async fn sign_in(&self, email: &str) -> Result<SessionUser> {
        let wanted = email.trim().to_lowercase();
        let users = self.api.list_users(ListQuery::all().search(wanted.clone())).await?;
        let user = users
            .iter()
            .find(|u| u.email.to_lowercase() == wanted)
            .ok_or_else(|| WardroomError::not_found("user", email))?;

        let session_user = SessionUser::from(user);
        self.state.session.sign_in(session_user.clone());

        if self.state.profile.get().name.is_empty() {
            self.state.profile.update(ProfilePatch {
                name: Some(user.name.clone()),
                email: Some(user.email.clone()),
                ..Default::default()
            });
        }
        Ok(session_user)
    }

    /// Ends the session and forgets the per-user two-factor and profile records
    pub fn sign_out(&self) {
        self.state.session.sign_out();
        self.state.two_factor.reset();
        self.state.profile.reset();
    }

    /// Turns on two-factor with a fresh secret and recovery codes
    pub fn enable_two_factor(&self, method: TwoFactorMethod) -> TwoFactorEnrollment {
        let enrollment = TwoFactorEnrollment {
            secret: generate_secret(),
            backup_codes: generate_backup_codes(BACKUP_CODE_COUNT),
        };
        self.state.two_factor.enable(method, enrollment.secret.clone());
        self.state
            .two_factor
            .set_backup_codes(enrollment.backup_codes.clone());
        self.state.notifications.add(
            NotificationEvent::new(
                NotificationType::TwoFactorEnabled,
                "Two-factor authentication enabled",
                format!("Sign-in now requires a code via {method}"),
            )
            .with_route("/settings/security")
            .with_metadata(json!({ "method": method.to_string() })),
        );
        enrollment
    }

    /// Turns off two-factor; does nothing if it is already off
    pub fn disable_two_factor(&self) -> bool {
        if !self.state.two_factor.is_enabled() {
            return false;
        }
        self.state.two_factor.disable();
        self.state.notifications.add(
            NotificationEvent::new(
                NotificationType::TwoFactorDisabled,
                "Two-factor authentication disabled",
                "Sign-in no longer requires a second factor",
            )
            .with_route("/settings/security"),
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::core::reactive::ThemeMode;

    fn console() -> Console {
        let mut config = WardroomConfig::default();
        config.api.latency_min_ms = 0;
        config.api.latency_max_ms = 0;
        Console::with_storage(&config, Arc::new(MemoryStorage::new())).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_fills_profile() {
        let console = console();
        let user = console.sign_in("OWNER@wardroom.dev").await.unwrap();
        assert_eq!(user.role, "Super Admin");
        assert!(console.state().session.is_signed_in());
        assert_eq!(console.state().profile.get().name, user.name);
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email() {
        let console = console();
        let err = console.sign_in("nobody@example.com").await.unwrap_err();
        assert!(matches!(err, WardroomError::NotFound { .. }));
        assert!(!console.state().session.is_signed_in());
    }

    #[tokio::test]
    async fn test_two_factor_toggle_notifies() {
        let console = console();
        let enrollment = console.enable_two_factor(TwoFactorMethod::Authenticator);
        assert_eq!(enrollment.backup_codes.len(), BACKUP_CODE_COUNT);
        assert!(console.state().two_factor.is_enabled());

        assert!(console.disable_two_factor());
        assert!(!console.disable_two_factor());

        let feed = console.state().notifications.list();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].kind, NotificationType::TwoFactorDisabled);
        assert_eq!(feed[1].kind, NotificationType::TwoFactorEnabled);
    }

    #[tokio::test]
    async fn test_theme_painted_on_document() {
        let console = console();
        assert_eq!(console.document().theme(), Some(ThemeMode::Light));
        console.state().theme.toggle();
        assert_eq!(console.document().theme(), Some(ThemeMode::Dark));
    }
}
