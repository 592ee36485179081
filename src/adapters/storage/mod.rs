//! Client-state persistence
//!
//! - [`traits`] - The [`StateStorage`] trait
//! - [`file`] - One JSON file per key
//! - [`memory`] - Process-lifetime map, for tests and throwaway sessions
//! - [`factory`] - Picks a backend from [`StorageConfig`](crate::config::StorageConfig)

pub mod factory;
pub mod file;
pub mod memory;
pub mod traits;

pub use factory::create_state_storage;
pub use file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use traits::StateStorage;
