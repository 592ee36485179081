//! Result type alias for Wardroom

use super::errors::WardroomError;

/// Result type alias for Wardroom operations
///
/// # Examples
///
/// ```
/// use wardroom::domain::result::Result;
/// use wardroom::domain::errors::WardroomError;
///
/// fn failing_function() -> Result<()> {
///     Err(WardroomError::ValidationFailed("name is required".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, WardroomError>;
