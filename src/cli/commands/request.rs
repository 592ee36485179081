//! Request command implementation
//!
//! Sends one request through the mock API against a freshly seeded store and prints the
//! JSON response. Notifications the request derives are persisted like any other client
//! state.

use super::{load_or_default, EXIT_CONFIG, EXIT_FATAL, EXIT_REJECTED};
use crate::core::api::Latency;
use crate::core::console::Console;
use crate::core::router::{ApiRequest, Method};
use crate::domain::ErrorBody;
use clap::Args;
use serde_json::Value;

/// Arguments for the request command
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, DELETE)
    pub method: String,

    /// Request path with optional query string, e.g. `/collection/users?search=ama`
    pub path: String,

    /// JSON request body
    #[arg(short, long)]
    pub body: Option<String>,

    /// Skip the artificial latency
    #[arg(long)]
    pub no_latency: bool,
}

impl RequestArgs {
    /// Build the request from the arguments
    fn build_request(&self) -> Result<ApiRequest, String> {
        let method: Method = self.method.parse()?;
        let mut request = ApiRequest::new(method, &self.path);
        if let Some(ref body) = self.body {
            let body: Value =
                serde_json::from_str(body).map_err(|e| format!("Invalid JSON body: {e}"))?;
            request = request.with_body(body);
        }
        Ok(request)
    }

    /// Execute the request command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let request = match self.build_request() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_REJECTED);
            }
        };

        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration file");
                eprintln!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let console = match Console::from_config(&config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to start console");
                eprintln!("   Error: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        let api = if self.no_latency {
            console.api().clone().with_latency(Latency::none())
        } else {
            console.api().clone()
        };

        tracing::info!(method = %request.method(), path = %request.path(), "Sending request");
        let unread_before = console.state().notifications.unread_count();

        match api.send(request).await {
            Ok(response) => {
                println!("{}", serde_json::to_string_pretty(&response)?);
                let unread = console.state().notifications.unread_count();
                if unread > unread_before {
                    eprintln!("🔔 {unread} unread notification(s)");
                }
                Ok(0)
            }
            Err(e) if e.is_client_error() => {
                println!("{}", serde_json::to_string_pretty(&ErrorBody::from(&e))?);
                eprintln!("❌ Request rejected ({})", e.status_code());
                Ok(EXIT_REJECTED)
            }
            Err(e) => {
                eprintln!("❌ Request failed");
                eprintln!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}
