//! In-memory state storage

use super::traits::StateStorage;
use crate::domain::errors::WardroomError;
use crate::domain::Result;
use std::collections::HashMap;
use std::sync::RwLock;

/// State storage that lives only as long as the process
///
/// Share one instance through an `Arc` to simulate a reload: a second set of stores built on
/// the same instance rehydrates what the first one wrote.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> WardroomError {
    WardroomError::State("memory storage lock poisoned".to_string())
}

impl StateStorage for MemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.load("wardroom:theme").unwrap().is_none());

        storage.save("wardroom:theme", "{\"mode\":\"dark\"}").unwrap();
        assert_eq!(
            storage.load("wardroom:theme").unwrap().as_deref(),
            Some("{\"mode\":\"dark\"}")
        );
        assert_eq!(storage.len(), 1);

        storage.remove("wardroom:theme").unwrap();
        storage.remove("wardroom:theme").unwrap();
        assert!(storage.is_empty());
    }
}
