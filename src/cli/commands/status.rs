//! Status command implementation
//!
//! This module implements the `status` command for displaying the persisted client state:
//! theme, two-factor settings, profile, session and the notification feed.

use super::{load_or_default, EXIT_CONFIG, EXIT_FATAL};
use crate::core::console::Console;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Number of recent notifications to list
    #[arg(long, default_value_t = 5)]
    pub recent: usize,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking console status");

        println!("📊 Console Status");
        println!();

        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let console = match Console::from_config(&config) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to open client state");
                println!("   Error: {e}");
                return Ok(EXIT_FATAL);
            }
        };
        let state = console.state();

        println!("  Theme: {}", state.theme.mode());

        let two_factor = state.two_factor.get();
        match two_factor.method {
            Some(method) if two_factor.enabled => println!(
                "  Two-Factor: ✅ Enabled ({method}, {} backup code(s) left)",
                two_factor.backup_codes.len()
            ),
            _ => println!("  Two-Factor: ⏸️  Disabled"),
        }

        match state.session.current_user() {
            Some(user) => println!("  Session: {} <{}> as {}", user.name, user.email, user.role),
            None => println!("  Session: Signed out"),
        }

        let profile = state.profile.get();
        if profile.name.is_empty() {
            println!("  Profile: (empty)");
        } else {
            println!("  Profile: {} <{}>", profile.name, profile.email);
        }

        let notifications = state.notifications.list();
        println!(
            "  Notifications: {} total, {} unread",
            notifications.len(),
            state.notifications.unread_count()
        );

        if !notifications.is_empty() && self.recent > 0 {
            println!();
            println!("{:<3} {:<22} {:<50}", "", "Time", "Title");
            println!("{}", "-".repeat(75));
            for n in notifications.iter().take(self.recent) {
                let marker = if n.read { "  " } else { "🔔" };
                println!(
                    "{:<3} {:<22} {:<50}",
                    marker,
                    n.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    n.title
                );
            }
        }

        println!();
        Ok(0)
    }
}
