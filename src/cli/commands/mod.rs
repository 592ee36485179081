//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod request;
pub mod routes;
pub mod status;
pub mod validate;

use crate::config::{load_config, WardroomConfig};
use crate::domain::Result;
use std::path::Path;

/// Exit code for a configuration error
pub const EXIT_CONFIG: i32 = 2;

/// Exit code for a request the API rejected
pub const EXIT_REJECTED: i32 = 3;

/// Exit code for anything else that went wrong
pub const EXIT_FATAL: i32 = 5;

/// Loads `path`, or built-in defaults when the file does not exist
pub(crate) fn load_or_default(path: &str) -> Result<WardroomConfig> {
    if Path::new(path).exists() {
        load_config(path)
    } else {
        tracing::debug!(config_path = %path, "No configuration file, using defaults");
        Ok(WardroomConfig::default())
    }
}
