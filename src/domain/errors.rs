//! Domain error types
//!
//! This module defines the error hierarchy for Wardroom. The first four variants are the
//! taxonomy every simulated API call can surface; the rest cover the ambient machinery
//! (configuration, persistence, serialization).

use serde::Serialize;
use thiserror::Error;

/// Main Wardroom error type
///
/// Entity store and router operations surface `NotFound`, `ValidationFailed` and
/// `PreconditionFailed` as rejected results. `UnroutedRequest` is only ever logged by the
/// router, which degrades it to an empty response.
#[derive(Debug, Error)]
pub enum WardroomError {
    /// The operation targets an id that does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind (e.g. "hospital")
        entity: &'static str,
        /// The id that was looked up
        id: String,
    },

    /// A required field is missing or a value is invalid
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The operation is not allowed in the current state (e.g. deleting a role in use)
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// No route matched the method and path
    #[error("Unrouted request: {method} {path}")]
    UnroutedRequest {
        /// Request method
        method: String,
        /// Request path, without query string
        path: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Persistence adapter errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Shared state errors (poisoned lock, failed background task)
    #[error("State error: {0}")]
    State(String),
}

impl WardroomError {
    /// Shorthand for a `NotFound` error
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a `ValidationFailed` error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    /// HTTP status a real backend would answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::UnroutedRequest { .. } => 404,
            Self::ValidationFailed(_) => 422,
            Self::PreconditionFailed(_) => 412,
            Self::Configuration(_)
            | Self::Storage(_)
            | Self::Serialization(_)
            | Self::Io(_)
            | Self::State(_) => 500,
        }
    }

    /// Whether the error is one a caller is expected to present to the user
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// JSON error body in the shape a real HTTP backend would return
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,

    /// HTTP-like status code
    pub status: u16,
}

impl From<&WardroomError> for ErrorBody {
    fn from(err: &WardroomError) -> Self {
        Self {
            error: err.to_string(),
            status: err.status_code(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for WardroomError {
    fn from(err: std::io::Error) -> Self {
        WardroomError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for WardroomError {
    fn from(err: serde_json::Error) -> Self {
        WardroomError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for WardroomError {
    fn from(err: toml::de::Error) -> Self {
        WardroomError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = WardroomError::not_found("hospital", "42");
        assert_eq!(err.to_string(), "hospital not found: 42");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(WardroomError::validation("x").status_code(), 422);
        assert_eq!(
            WardroomError::PreconditionFailed("in use".to_string()).status_code(),
            412
        );
        assert_eq!(WardroomError::Storage("disk".to_string()).status_code(), 500);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(WardroomError::validation("x").is_client_error());
        assert!(!WardroomError::Io("x".to_string()).is_client_error());
    }

    #[test]
    fn test_error_body_from_error() {
        let err = WardroomError::PreconditionFailed("role in use".to_string());
        let body = ErrorBody::from(&err);
        assert_eq!(body.status, 412);
        assert_eq!(body.error, "Precondition failed: role in use");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: WardroomError = io_err.into();
        assert!(matches!(err, WardroomError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: WardroomError = json_err.into();
        assert!(matches!(err, WardroomError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: WardroomError = toml_err.into();
        assert!(matches!(err, WardroomError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
