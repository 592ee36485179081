// Wardroom - Hospital Administration Console Backend
// Copyright (c) 2025 Wardroom Contributors
// Licensed under the MIT License

//! # Wardroom - Hospital Administration Console Backend
//!
//! Wardroom simulates the backend of a multi-tenant hospital administration console. An
//! in-memory entity store holds hospitals, users, roles, patients and clinicians; a router
//! maps REST-style requests onto it; and a mock API serves it asynchronously with artificial
//! latency. Client-side state (notifications, theme, two-factor, profile, session) lives in
//! small reactive stores persisted to local storage.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (entity store, router, mock API, reactive stores)
//! - [`adapters`] - Client-state persistence backends
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wardroom::core::api::MockApi;
//! use wardroom::core::store::{seed_demo_data, EntityStore, ListQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = EntityStore::new();
//!     seed_demo_data(&mut store)?;
//!
//!     let api = MockApi::new(store);
//!     let hospitals = api.list_hospitals(ListQuery::all().search("city")).await?;
//!
//!     println!("Found {} hospital(s)", hospitals.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Integrity Rules
//!
//! Cross-entity rules run inside the store operation that could break them:
//!
//! - Creating a hospital with admin credentials also creates its `Hospital Admin` user,
//!   or neither record
//! - Any user other than a `Super Admin` must belong to an existing hospital
//! - A role still assigned to users cannot be deleted
//! - Renaming a role renames it on every user and clinician holding it
//!
//! ```rust
//! use wardroom::core::store::EntityStore;
//! use wardroom::domain::{NewRole, NewUser, WardroomError};
//!
//! let mut store = EntityStore::new();
//! let porter = store.create_role(NewRole::new("Porter", "Moves patients")).unwrap();
//! let err = store
//!     .create_user(NewUser::new("Kofi", "kofi@example.com", "Porter", None))
//!     .unwrap_err();
//! assert!(matches!(err, WardroomError::ValidationFailed(_)));
//! assert!(store.delete_role(&porter.id).is_ok());
//! ```
//!
//! ## Error Handling
//!
//! Wardroom uses the [`domain::WardroomError`] type for all errors. Domain failures carry an
//! HTTP-like status code:
//!
//! ```rust
//! use wardroom::domain::WardroomError;
//!
//! let err = WardroomError::not_found("hospital", "42");
//! assert_eq!(err.status_code(), 404);
//! ```
//!
//! ## Logging
//!
//! Wardroom uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(hospital_id = "1", "Hospital created");
//! warn!(role = "Clinician", users = 3, "Role still in use");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
