//! State storage factory
//!
//! This module creates the state storage backend named by the configuration.

use super::file::JsonFileStorage;
use super::memory::MemoryStorage;
use super::traits::StateStorage;
use crate::config::schema::{StorageBackend, StorageConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Create a state storage backend based on the configuration
///
/// # Errors
///
/// Returns an error if the file backend's directory cannot be created
pub fn create_state_storage(config: &StorageConfig) -> Result<Arc<dyn StateStorage>> {
    match config.backend {
        StorageBackend::File => {
            tracing::debug!(path = %config.path, "Opening file state storage");
            let storage = JsonFileStorage::open(&config.path)?;
            Ok(Arc::new(storage) as Arc<dyn StateStorage>)
        }
        StorageBackend::Memory => {
            tracing::debug!("Using in-memory state storage");
            Ok(Arc::new(MemoryStorage::new()) as Arc<dyn StateStorage>)
        }
    }
}
