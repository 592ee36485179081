//! Two-factor authentication settings

use super::container::{PersistedRecord, ReactiveStore};
use crate::adapters::storage::StateStorage;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use zeroize::Zeroize;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const BACKUP_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a generated authenticator secret (160 bits of base32)
pub const SECRET_LENGTH: usize = 32;

/// Second-factor delivery method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwoFactorMethod {
    /// TOTP authenticator app
    Authenticator,
    /// Code by text message
    Sms,
    /// Code by email
    Email,
}

impl fmt::Display for TwoFactorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TwoFactorMethod::Authenticator => "authenticator",
            TwoFactorMethod::Sms => "sms",
            TwoFactorMethod::Email => "email",
        })
    }
}

/// Persisted two-factor record
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorState {
    /// Whether a second factor is required at sign-in
    pub enabled: bool,

    /// Delivery method while enabled
    pub method: Option<TwoFactorMethod>,

    /// Shared authenticator secret
    pub secret: Option<String>,

    /// Unused single-use recovery codes
    pub backup_codes: Vec<String>,

    /// When two-factor was last enabled
    pub enabled_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for TwoFactorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoFactorState")
            .field("enabled", &self.enabled)
            .field("method", &self.method)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("backup_codes", &self.backup_codes.len())
            .field("enabled_at", &self.enabled_at)
            .finish()
    }
}

impl TwoFactorState {
    /// Overwrites the secret and every backup code in place, then empties both
    fn wipe(&mut self) {
        self.secret.zeroize();
        self.backup_codes.zeroize();
    }
}

// Every copy handed out by the store, and the record replaced on each write, wipes its
// secrets when dropped.
impl Drop for TwoFactorState {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl PersistedRecord for TwoFactorState {
    const KEY: &'static str = "two-factor";
}

/// Generates a random base32 authenticator secret
pub fn generate_secret() -> String {
    let mut rng = rand::thread_rng();
    (0..SECRET_LENGTH)
        .map(|_| BASE32_ALPHABET[rng.gen_range(0..BASE32_ALPHABET.len())] as char)
        .collect()
}

/// Generates `count` recovery codes shaped `XXXX-XXXX`
pub fn generate_backup_codes(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    let mut chunk = || -> String {
        (0..4)
            .map(|_| BACKUP_CODE_ALPHABET[rng.gen_range(0..BACKUP_CODE_ALPHABET.len())] as char)
            .collect()
    };
    (0..count)
        .map(|_| format!("{}-{}", chunk(), chunk()))
        .collect()
}

/// Reactive two-factor settings
pub struct TwoFactorStore {
    inner: ReactiveStore<TwoFactorState>,
}

impl TwoFactorStore {
    /// Loads the persisted settings
    pub fn load(storage: Arc<dyn StateStorage>, namespace: &str) -> Self {
        Self {
            inner: ReactiveStore::load(storage, namespace),
        }
    }

    /// Clone of the current settings
    pub fn get(&self) -> TwoFactorState {
        self.inner.get()
    }

    /// Whether two-factor is on
    pub fn is_enabled(&self) -> bool {
        self.inner.read(|s| s.enabled)
    }

    /// Turns two-factor on with the given method and secret
    pub fn enable(&self, method: TwoFactorMethod, secret: impl Into<String>) {
        let secret = secret.into();
        self.inner.update(|state| {
            state.secret.zeroize();
            state.enabled = true;
            state.method = Some(method);
            state.secret = Some(secret);
            state.enabled_at = Some(Utc::now());
        });
        tracing::info!(method = %method, "Two-factor enabled");
    }

    /// Turns two-factor off, wiping the secret and every backup code
    pub fn disable(&self) {
        self.inner.update(|state| *state = TwoFactorState::default());
        tracing::info!("Two-factor disabled");
    }

    /// Replaces the recovery codes
    pub fn set_backup_codes(&self, codes: Vec<String>) {
        self.inner.update(|state| {
            state.backup_codes.zeroize();
            state.backup_codes = codes;
        });
    }

    /// Consumes a recovery code; returns whether it was valid
    ///
    /// Matching ignores case and surrounding whitespace. Codes are only accepted while
    /// two-factor is enabled.
    pub fn redeem_backup_code(&self, code: &str) -> bool {
        let code = code.trim().to_uppercase();
        let redeemed = self.inner.update(|state| {
            if !state.enabled {
                return false;
            }
            match state.backup_codes.iter().position(|c| *c == code) {
                Some(index) => {
                    let mut used = state.backup_codes.remove(index);
                    used.zeroize();
                    true
                }
                None => false,
            }
        });
        if !redeemed {
            tracing::warn!("Rejected two-factor backup code");
        }
        redeemed
    }

    /// Forgets every setting
    pub fn reset(&self) {
        self.inner.reset();
    }

    /// Receiver that observes every change
    pub fn subscribe(&self) -> watch::Receiver<TwoFactorState> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;

    fn store() -> TwoFactorStore {
        TwoFactorStore::load(Arc::new(MemoryStorage::new()), "test")
    }

    #[test]
    fn test_generate_secret_is_base32() {
        let secret = generate_secret();
        assert_eq!(secret.len(), SECRET_LENGTH);
        assert!(secret.bytes().all(|b| BASE32_ALPHABET.contains(&b)));
        assert_ne!(secret, generate_secret());
    }

    #[test]
    fn test_generate_backup_codes_shape() {
        let codes = generate_backup_codes(8);
        assert_eq!(codes.len(), 8);
        for code in codes {
            assert_eq!(code.len(), 9);
            assert_eq!(&code[4..5], "-");
        }
    }

    #[test]
    fn test_enable_then_disable_clears_everything() {
        let store = store();
        store.enable(TwoFactorMethod::Authenticator, "JBSWY3DPEHPK3PXP");
        store.set_backup_codes(vec!["AAAA-BBBB".to_string()]);
        assert!(store.is_enabled());
        assert!(store.get().enabled_at.is_some());

        store.disable();
        assert_eq!(store.get(), TwoFactorState::default());
    }

    #[test]
    fn test_backup_codes_are_single_use() {
        let store = store();
        store.enable(TwoFactorMethod::Sms, "");
        store.set_backup_codes(vec!["AAAA-BBBB".to_string(), "CCCC-DDDD".to_string()]);

        assert!(store.redeem_backup_code(" aaaa-bbbb "));
        assert!(!store.redeem_backup_code("AAAA-BBBB"));
        assert_eq!(store.get().backup_codes, vec!["CCCC-DDDD"]);
    }

    #[test]
    fn test_backup_codes_rejected_while_disabled() {
        let store = store();
        store.set_backup_codes(vec!["AAAA-BBBB".to_string()]);
        assert!(!store.redeem_backup_code("AAAA-BBBB"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut state = TwoFactorState::default();
        state.secret = Some("JBSWY3DPEHPK3PXP".to_string());
        assert!(!format!("{state:?}").contains("JBSWY3DPEHPK3PXP"));
    }

    #[test]
    fn test_wipe_clears_secret_material() {
        let mut state = TwoFactorState::default();
        state.enabled = true;
        state.secret = Some("JBSWY3DPEHPK3PXP".to_string());
        state.backup_codes = vec!["AAAA-BBBB".to_string()];

        state.wipe();
        assert!(state.secret.is_none());
        assert!(state.backup_codes.is_empty());
        assert!(state.enabled);
    }

    #[test]
    fn test_disable_replaces_live_state() {
        let store = store();
        let mut rx = store.subscribe();
        store.enable(TwoFactorMethod::Authenticator, "JBSWY3DPEHPK3PXP");
        store.set_backup_codes(generate_backup_codes(2));
        rx.borrow_and_update();

        store.disable();
        assert!(rx.has_changed().unwrap());
        let live = rx.borrow_and_update().clone();
        assert!(live.secret.is_none());
        assert!(live.backup_codes.is_empty());
    }
}
