//! Routes command implementation

use super::{load_or_default, EXIT_CONFIG};
use crate::core::router::Router;
use clap::Args;

/// Arguments for the routes command
#[derive(Args, Debug)]
pub struct RoutesArgs {
    /// Only show routes with this method
    #[arg(long)]
    pub method: Option<String>,
}

impl RoutesArgs {
    /// Execute the routes command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let router = Router::new(&config.api.base_path);
        let wanted = self.method.as_deref().map(str::to_ascii_uppercase);

        println!("🧭 Routes under {}", router.base_path());
        println!();
        println!("{:<8} {:<60} {:<25}", "Method", "Path", "Operation");
        println!("{}", "-".repeat(93));

        let mut shown = 0;
        for route in router.routes() {
            if wanted.as_deref().is_some_and(|m| m != route.method().as_str()) {
                continue;
            }
            println!(
                "{:<8} {:<60} {:<25}",
                route.method().as_str(),
                route.pattern().to_string(),
                route.operation()
            );
            shown += 1;
        }

        println!();
        println!("{shown} route(s)");
        Ok(0)
    }
}
