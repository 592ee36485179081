//! Configuration management for Wardroom.
//!
//! Wardroom reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `WARDROOM_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wardroom::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("wardroom.toml")?;
//! println!("Latency: {}..{} ms", config.api.latency_min_ms, config.api.latency_max_ms);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ApiConfig`] - Base path, artificial latency, demo data seeding
//! - [`StorageConfig`] - Where client state (theme, notifications, ...) is persisted
//! - [`NotificationsConfig`] - Feed size cap
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_path = "/collection"
//! latency_min_ms = 100
//! latency_max_ms = 800
//!
//! [storage]
//! backend = "file"
//! path = "${HOME}/.wardroom/state"
//! namespace = "wardroom"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApiConfig, ApplicationConfig, LoggingConfig, NotificationsConfig, StorageBackend,
    StorageConfig, WardroomConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
