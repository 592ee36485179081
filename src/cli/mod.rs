//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Wardroom using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Wardroom - Hospital Administration Console Backend
#[derive(Parser, Debug)]
#[command(name = "wardroom")]
#[command(version, about, long_about = None)]
#[command(author = "Wardroom Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "wardroom.toml", env = "WARDROOM_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WARDROOM_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one request to the mock API
    Request(commands::request::RequestArgs),

    /// List the route table
    Routes(commands::routes::RoutesArgs),

    /// Show persisted client state
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
