//! External system integrations for Wardroom.
//!
//! The simulated backend has a single external dependency: somewhere to keep client state
//! between runs. [`storage`] provides the [`StateStorage`](storage::StateStorage) trait and
//! its backends.
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and enable
//! testing with in-memory implementations.
//!
//! ```rust
//! use std::sync::Arc;
//! use wardroom::adapters::storage::{MemoryStorage, StateStorage};
//!
//! let storage: Arc<dyn StateStorage> = Arc::new(MemoryStorage::new());
//! storage.save("wardroom:theme", r#"{"state":{"mode":"dark"},"version":1}"#).unwrap();
//! assert!(storage.load("wardroom:theme").unwrap().is_some());
//! ```

pub mod storage;
