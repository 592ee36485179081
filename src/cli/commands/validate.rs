//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Wardroom configuration file.

use super::EXIT_CONFIG;
use crate::config::load_config;
use crate::config::schema::StorageBackend;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Base Path: {}", config.api.base_path);
        println!(
            "  Latency: {}..{} ms",
            config.api.latency_min_ms, config.api.latency_max_ms
        );
        println!("  Seed Demo Data: {}", config.api.seed_demo_data);
        match config.storage.backend {
            StorageBackend::File => {
                println!("  Storage: file ({})", config.storage.path);
            }
            StorageBackend::Memory => println!("  Storage: memory"),
        }
        println!("  Namespace: {}", config.storage.namespace);
        println!("  Max Notifications: {}", config.notifications.max_entries);
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}.execute("missing-wardroom.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_latency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wardroom.toml");
        std::fs::write(&path, "[api]\nlatency_min_ms = 900\nlatency_max_ms = 100\n").unwrap();
        let code = ValidateArgs {}.execute(path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
