//! Integration tests for persisted client state

use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use wardroom::adapters::storage::{JsonFileStorage, StateStorage};
use wardroom::config::{StorageBackend, WardroomConfig};
use wardroom::core::console::Console;
use wardroom::core::reactive::{
    ClientState, DocumentRoot, NotificationStore, ThemeMode, ThemeStore, TwoFactorMethod,
    TwoFactorState,
};
use wardroom::domain::{NotificationEvent, NotificationType};

fn file_storage(dir: &TempDir) -> Arc<dyn StateStorage> {
    Arc::new(JsonFileStorage::open(dir.path()).unwrap())
}

fn event(title: &str) -> NotificationEvent {
    NotificationEvent::new(NotificationType::SystemAbnormal, title, "details")
}

#[test]
fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let document = Arc::new(DocumentRoot::new());
        let state = ClientState::load(file_storage(&dir), "wardroom", 100, document);
        state.theme.set(ThemeMode::Dark);
        state.notifications.add(event("Disk nearly full"));
        state.two_factor.enable(TwoFactorMethod::Email, "");
    }

    let document = Arc::new(DocumentRoot::new());
    let state = ClientState::load(file_storage(&dir), "wardroom", 100, document.clone());
    assert_eq!(state.theme.mode(), ThemeMode::Dark);
    assert_eq!(document.theme(), Some(ThemeMode::Dark));
    assert_eq!(state.notifications.list()[0].title, "Disk nearly full");
    assert!(state.two_factor.is_enabled());
}

#[test]
fn test_persisted_layout_is_versioned_envelope() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::open(dir.path()).unwrap();
    let document = Arc::new(DocumentRoot::new());
    let theme = ThemeStore::load(Arc::new(storage.clone()), "wardroom", document);
    theme.toggle();

    let raw = std::fs::read_to_string(storage.path_for("wardroom:theme")).unwrap();
    let document: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(document["version"], 1);
    assert_eq!(document["state"]["mode"], "dark");
}

#[test]
fn test_notifications_newest_first() {
    let dir = TempDir::new().unwrap();
    let feed = NotificationStore::load(file_storage(&dir), "wardroom", 100);

    for title in ["first", "second", "third"] {
        feed.add(event(title));
    }

    let titles: Vec<_> = feed.list().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    assert_eq!(feed.unread_count(), 3);

    assert_eq!(feed.mark_all_read(), 3);
    assert_eq!(feed.unread_count(), 0);
}

#[test]
fn test_theme_toggle_round_trip() {
    let dir = TempDir::new().unwrap();
    let document = Arc::new(DocumentRoot::new());
    let theme = ThemeStore::load(file_storage(&dir), "wardroom", document.clone());
    let mut changes = theme.subscribe();

    assert_eq!(theme.mode(), ThemeMode::Light);

    assert_eq!(theme.toggle(), ThemeMode::Dark);
    assert!(document.has_class("dark"));
    assert!(!document.has_class("light"));
    assert_eq!(changes.borrow_and_update().mode, ThemeMode::Dark);

    assert_eq!(theme.toggle(), ThemeMode::Light);
    assert!(document.has_class("light"));
    assert!(!document.has_class("dark"));
    assert_eq!(changes.borrow_and_update().mode, ThemeMode::Light);

    let fresh = Arc::new(DocumentRoot::new());
    let reloaded = ThemeStore::load(file_storage(&dir), "wardroom", fresh);
    assert_eq!(reloaded.mode(), ThemeMode::Light);
}

#[test]
fn test_corrupt_document_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let storage = file_storage(&dir);
    storage.save("wardroom:two-factor", "{not json").unwrap();

    let state = ClientState::load(storage, "wardroom", 100, Arc::new(DocumentRoot::new()));
    assert_eq!(state.two_factor.get(), TwoFactorState::default());
}

#[tokio::test]
async fn test_console_two_factor_and_sign_out() {
    let dir = TempDir::new().unwrap();
    let mut config = WardroomConfig::default();
    config.api.latency_min_ms = 0;
    config.api.latency_max_ms = 0;
    config.storage.backend = StorageBackend::File;
    config.storage.path = dir.path().to_string_lossy().to_string();

    let console = Console::from_config(&config).unwrap();
    console.sign_in("esi.mensah@citygeneral.org").await.unwrap();
    let enrollment = console.enable_two_factor(TwoFactorMethod::Authenticator);
    assert!(console.state().two_factor.redeem_backup_code(&enrollment.backup_codes[0]));

    console.sign_out();

    let state = console.state();
    assert!(!state.session.is_signed_in());
    assert_eq!(state.two_factor.get(), TwoFactorState::default());
    assert!(state.profile.get().name.is_empty());
    // The feed outlives the session
    assert_eq!(state.notifications.list()[0].kind, NotificationType::TwoFactorEnabled);
}
