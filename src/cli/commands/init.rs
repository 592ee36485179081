//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL};
use clap::Args;
use std::fs;
use std::path::Path;

/// Sample configuration written by `wardroom init`
pub const CONFIG_TEMPLATE: &str = r#"# Wardroom Configuration File
# Hospital administration console backend

[application]
log_level = "info"          # trace | debug | info | warn | error

[api]
# Prefix every route is mounted under
base_path = "/collection"
# Artificial latency applied to every call, in milliseconds
latency_min_ms = 100
latency_max_ms = 800
# Start from demo hospitals, users, roles, patients and clinicians
seed_demo_data = true

[storage]
backend = "file"            # file | memory
path = ".wardroom/state"
namespace = "wardroom"

[notifications]
# Oldest notifications are dropped beyond this many (0 = unlimited)
max_entries = 100

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"    # daily | hourly
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "wardroom.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Wardroom configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, CONFIG_TEMPLATE) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: wardroom validate-config");
                println!("  3. List the API: wardroom routes");
                println!("  4. Try a call: wardroom request GET /collection/hospitals");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, WardroomConfig};
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = parse_config(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, WardroomConfig::default());
    }

    #[tokio::test]
    async fn test_init_creates_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("wardroom.toml");
        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), CONFIG_TEMPLATE);
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("wardroom.toml");
        fs::write(&output, "keep me").unwrap();

        let mut args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

        args.force = true;
        assert_eq!(args.execute().await.unwrap(), 0);
    }
}
