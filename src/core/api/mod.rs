//! Mock API
//!
//! The asynchronous surface the console talks to. [`MockApi`] adds artificial latency,
//! runs every operation as a non-cancellable task, and feeds derived notifications into an
//! attached [`NotificationStore`](crate::core::reactive::NotificationStore).
//!
//! # Example
//!
//! ```rust
//! use wardroom::core::api::{Latency, MockApi};
//! use wardroom::core::store::{EntityStore, ListQuery};
//!
//! # async fn example() -> wardroom::domain::Result<()> {
//! let api = MockApi::new(EntityStore::new()).with_latency(Latency::none());
//! let roles = api.list_roles(ListQuery::all()).await?;
//! assert_eq!(roles.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod events;
pub mod latency;

pub use client::{ApiClient, MockApi, PendingCall};
pub use latency::Latency;
