//! File-backed state storage
//!
//! Each key is one JSON file under the configured directory. Writes go to a sibling `.tmp`
//! file first and are renamed into place, so a crash mid-write leaves the previous document.

use super::traits::StateStorage;
use crate::domain::errors::WardroomError;
use crate::domain::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// State storage writing one file per key
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    /// Opens (and creates, if needed) the storage directory
    ///
    /// # Errors
    ///
    /// `Storage` if the directory cannot be created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            WardroomError::Storage(format!(
                "Failed to create state directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    /// Storage directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds `key`
    ///
    /// `:` becomes `.`; anything outside `[A-Za-z0-9._-]` becomes `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| match c {
                ':' => '.',
                c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => c,
                _ => '_',
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

impl StateStorage for JsonFileStorage {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WardroomError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| {
                WardroomError::Storage(format!("Failed to write {}: {}", path.display(), e))
            })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WardroomError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_for_sanitises_key() {
        let storage = JsonFileStorage { root: PathBuf::from("/state") };
        assert_eq!(
            storage.path_for("wardroom:two-factor"),
            PathBuf::from("/state/wardroom.two-factor.json")
        );
        assert_eq!(
            storage.path_for("a/../b"),
            PathBuf::from("/state/a_.._b.json")
        );
    }

    #[test]
    fn test_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::open(dir.path().join("nested/state")).unwrap();

        assert!(storage.load("wardroom:profile").unwrap().is_none());
        storage.save("wardroom:profile", "{\"version\":1}").unwrap();
        storage.save("wardroom:profile", "{\"version\":2}").unwrap();

        let reopened = JsonFileStorage::open(storage.root()).unwrap();
        assert_eq!(
            reopened.load("wardroom:profile").unwrap().as_deref(),
            Some("{\"version\":2}")
        );

        reopened.remove("wardroom:profile").unwrap();
        reopened.remove("wardroom:profile").unwrap();
        assert!(reopened.load("wardroom:profile").unwrap().is_none());
    }
}
