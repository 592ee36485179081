//! Entity store
//!
//! The in-memory collections behind the simulated API, the list query type the router
//! builds, the cross-collection integrity rules, and the demo data set.

pub mod entity_store;
pub mod integrity;
pub mod query;
pub mod seed;

pub use entity_store::{DashboardStats, EntityStore};
pub use query::{ListQuery, Listable, DEFAULT_PAGE_SIZE};
pub use seed::seed_demo_data;
