//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels (`RUST_LOG` wins when set)
//! - Human-readable console output
//! - Optional JSON file logging with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use wardroom::logging::init_logging;
//! use wardroom::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Console started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard, LOG_FILE_PREFIX};

/// Log a request the router matched
///
/// # Example
///
/// ```no_run
/// use wardroom::log_api_request;
///
/// log_api_request!("GET", "/collection/hospitals", "list_hospitals");
/// ```
#[macro_export]
macro_rules! log_api_request {
    ($method:expr, $path:expr, $operation:expr) => {
        tracing::debug!(
            method = %$method,
            path = %$path,
            operation = $operation,
            "Routing request"
        );
    };
}

/// Log a request no route matched
///
/// # Example
///
/// ```no_run
/// use wardroom::log_unrouted_request;
/// use wardroom::domain::WardroomError;
///
/// let error = WardroomError::UnroutedRequest {
///     method: "PATCH".to_string(),
///     path: "/collection/hospitals".to_string(),
/// };
/// log_unrouted_request!(&error);
/// ```
#[macro_export]
macro_rules! log_unrouted_request {
    ($error:expr) => {
        tracing::warn!(
            error = %$error,
            status = $error.status_code(),
            "No route matched; answering with an empty object"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use wardroom::log_error_with_context;
/// use wardroom::domain::WardroomError;
///
/// let error = WardroomError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
