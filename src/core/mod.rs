//! Core business logic for Wardroom.
//!
//! # Modules
//!
//! - [`store`] - Entity store, integrity rules, list queries, demo data
//! - [`router`] - Method + path dispatch onto store operations
//! - [`api`] - Asynchronous mock API with artificial latency and derived notifications
//! - [`reactive`] - Persisted client-state stores (notifications, theme, 2FA, profile, session)
//! - [`console`] - Wires the API and client state together from configuration
//!
//! # Request Flow
//!
//! 1. **Call**: the caller issues a typed call or an [`ApiRequest`](router::ApiRequest)
//! 2. **Latency**: the mock API waits out a sampled delay
//! 3. **Route**: method, path and query are matched against the route table
//! 4. **Apply**: one entity store operation runs, integrity rules included
//! 5. **Notify**: a derived notification, if any, is prepended to the feed
//!
//! # Example
//!
//! ```rust,no_run
//! use wardroom::config::load_config;
//! use wardroom::core::console::Console;
//! use wardroom::core::router::ApiRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("wardroom.toml")?;
//! let console = Console::from_config(&config)?;
//!
//! let hospitals = console
//!     .api()
//!     .send(ApiRequest::get("/collection/hospitals?search=city"))
//!     .await?;
//! println!("{hospitals}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod console;
pub mod reactive;
pub mod router;
pub mod store;
