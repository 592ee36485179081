//! Configuration schema types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for the simulated latency, in milliseconds
pub const MAX_LATENCY_MS: u64 = 10_000;

/// Main Wardroom configuration
///
/// This is the root configuration structure that maps to the TOML file. Every section is
/// optional; absent sections fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WardroomConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Simulated API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Client-state persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Notification feed settings
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WardroomConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error message naming the first invalid value
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Simulated API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Path prefix every route lives under
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Minimum artificial latency per call, in milliseconds
    #[serde(default = "default_latency_min_ms")]
    pub latency_min_ms: u64,

    /// Maximum artificial latency per call, in milliseconds
    #[serde(default = "default_latency_max_ms")]
    pub latency_max_ms: u64,

    /// Populate the entity store with demo hospitals, users and patients
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

impl ApiConfig {
    /// Latency bounds as durations
    pub fn latency_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.latency_min_ms),
            Duration::from_millis(self.latency_max_ms),
        )
    }

    fn validate(&self) -> Result<(), String> {
        if !self.base_path.starts_with('/') {
            return Err(format!(
                "api.base_path must start with '/', got '{}'",
                self.base_path
            ));
        }

        if self.latency_min_ms > self.latency_max_ms {
            return Err(format!(
                "api.latency_min_ms ({}) must be <= api.latency_max_ms ({})",
                self.latency_min_ms, self.latency_max_ms
            ));
        }

        if self.latency_max_ms > MAX_LATENCY_MS {
            return Err(format!(
                "api.latency_max_ms must be <= {}, got {}",
                MAX_LATENCY_MS, self.latency_max_ms
            ));
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            latency_min_ms: default_latency_min_ms(),
            latency_max_ms: default_latency_max_ms(),
            seed_demo_data: true,
        }
    }
}

/// Persistence backend for client state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key under `storage.path`
    #[default]
    File,
    /// Process memory only; state is lost on exit
    Memory,
}

/// Client-state persistence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend
    #[serde(default = "default_storage_path")]
    pub path: String,

    /// Key namespace, e.g. `wardroom` gives keys like `wardroom:theme`
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.namespace.trim().is_empty() {
            return Err("storage.namespace cannot be empty".to_string());
        }
        if self.backend == StorageBackend::File && self.path.trim().is_empty() {
            return Err("storage.path cannot be empty when backend = 'file'".to_string());
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            namespace: default_namespace(),
        }
    }
}

/// Notification feed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Maximum number of notifications kept; the oldest are dropped first (0 = unlimited)
    #[serde(default = "default_max_notifications")]
    pub max_entries: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_notifications(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }

    /// Console-only logging, as used by the CLI
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_base_path() -> String {
    "/collection".to_string()
}

fn default_latency_min_ms() -> u64 {
    100
}

fn default_latency_max_ms() -> u64 {
    800
}

fn default_storage_path() -> String {
    ".wardroom/state".to_string()
}

fn default_namespace() -> String {
    "wardroom".to_string()
}

fn default_max_notifications() -> usize {
    100
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
