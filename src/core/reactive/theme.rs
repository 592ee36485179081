//! Theme store
//!
//! Every theme change is applied to the [`ThemeTarget`] before subscribers hear about it, so
//! anything reacting to the broadcast already sees the document root in the new state.

use super::container::{PersistedRecord, ReactiveStore};
use crate::adapters::storage::StateStorage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

/// Light or dark
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl ThemeMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Class name applied to the document root
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("Unknown theme '{other}'. Must be one of: light, dark")),
        }
    }
}

/// Persisted theme record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeState {
    /// Current mode
    pub mode: ThemeMode,
}

impl PersistedRecord for ThemeState {
    const KEY: &'static str = "theme";
}

/// Whatever renders the theme (the console's document root)
pub trait ThemeTarget: Send + Sync {
    /// Makes `mode` visible; called synchronously on every change
    fn apply_theme(&self, mode: ThemeMode);
}

/// In-process stand-in for the document root element
///
/// Holds the root's class list; applying a theme swaps the `light`/`dark` class.
#[derive(Debug, Default)]
pub struct DocumentRoot {
    classes: RwLock<BTreeSet<String>>,
}

impl DocumentRoot {
    /// Creates a root with no classes
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the root carries `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(class)
    }

    /// Theme currently shown, if any was applied
    pub fn theme(&self) -> Option<ThemeMode> {
        [ThemeMode::Dark, ThemeMode::Light]
            .into_iter()
            .find(|mode| self.has_class(mode.as_str()))
    }
}

impl ThemeTarget for DocumentRoot {
    fn apply_theme(&self, mode: ThemeMode) {
        let mut classes = self.classes.write().unwrap_or_else(PoisonError::into_inner);
        classes.remove(mode.toggled().as_str());
        classes.insert(mode.as_str().to_string());
    }
}

/// Reactive theme preference
pub struct ThemeStore {
    inner: ReactiveStore<ThemeState>,
    target: Arc<dyn ThemeTarget>,
}

impl ThemeStore {
    /// Loads the persisted theme and applies it to `target` immediately
    pub fn load(
        storage: Arc<dyn StateStorage>,
        namespace: &str,
        target: Arc<dyn ThemeTarget>,
    ) -> Self {
        let inner = ReactiveStore::<ThemeState>::load(storage, namespace);
        target.apply_theme(inner.read(|s| s.mode));
        Self { inner, target }
    }

    /// Current mode
    pub fn mode(&self) -> ThemeMode {
        self.inner.read(|s| s.mode)
    }

    /// Switches to `mode`
    pub fn set(&self, mode: ThemeMode) {
        let target = &self.target;
        self.inner.update(|state| {
            state.mode = mode;
            target.apply_theme(mode);
        });
        tracing::debug!(theme = %mode, "Theme changed");
    }

    /// Flips between light and dark, returning the new mode
    pub fn toggle(&self) -> ThemeMode {
        let target = &self.target;
        let mode = self.inner.update(|state| {
            state.mode = state.mode.toggled();
            target.apply_theme(state.mode);
            state.mode
        });
        tracing::debug!(theme = %mode, "Theme toggled");
        mode
    }

    /// Returns to the default (light) theme and forgets the persisted choice
    pub fn reset(&self) {
        self.target.apply_theme(ThemeMode::default());
        self.inner.reset();
    }

    /// Receiver that observes every change
    pub fn subscribe(&self) -> watch::Receiver<ThemeState> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;

    #[test]
    fn test_theme_mode_parse() {
        assert_eq!("Dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert!("sepia".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_document_root_swaps_class() {
        let root = DocumentRoot::new();
        assert_eq!(root.theme(), None);
        root.apply_theme(ThemeMode::Dark);
        root.apply_theme(ThemeMode::Light);
        assert!(root.has_class("light"));
        assert!(!root.has_class("dark"));
    }

    #[test]
    fn test_persisted_theme_applied_on_load() {
        let storage: Arc<dyn StateStorage> = Arc::new(MemoryStorage::new());
        ThemeStore::load(storage.clone(), "test", Arc::new(DocumentRoot::new())).set(ThemeMode::Dark);

        let root = Arc::new(DocumentRoot::new());
        let store = ThemeStore::load(storage, "test", root.clone());
        assert_eq!(store.mode(), ThemeMode::Dark);
        assert_eq!(root.theme(), Some(ThemeMode::Dark));
    }

    #[test]
    fn test_reset_restores_light() {
        let root = Arc::new(DocumentRoot::new());
        let store = ThemeStore::load(Arc::new(MemoryStorage::new()), "test", root.clone());
        store.toggle();
        store.reset();
        assert_eq!(store.mode(), ThemeMode::Light);
        assert_eq!(root.theme(), Some(ThemeMode::Light));
    }
}
