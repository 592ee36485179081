//! Request router
//!
//! Translates an HTTP-shaped call (method, path, query string, JSON body) into exactly one
//! entity store operation through an explicit, ordered route table.
//!
//! # Example
//!
//! ```rust
//! use wardroom::core::router::{ApiRequest, Router};
//! use wardroom::core::store::EntityStore;
//!
//! let router = Router::default();
//! let mut store = EntityStore::new();
//! let roles = router
//!     .dispatch(&mut store, &ApiRequest::get("/collection/roles?search=admin"))
//!     .unwrap()
//!     .response();
//! assert_eq!(roles.as_array().unwrap().len(), 2);
//! ```

pub mod pattern;
pub mod request;
pub mod table;

pub use pattern::{PathPattern, RouteParams};
pub use request::{ApiRequest, Method};
pub use table::{Handler, Mutation, Route, RouteOutcome, Router, DEFAULT_BASE_PATH};
