//! State storage abstraction
//!
//! Reactive stores persist one JSON document per key through this trait. It plays the part a
//! browser's local storage plays for the console: a flat string-to-string map that survives
//! restarts of the process.

/// Key-value persistence for client state
///
/// Keys are namespaced by the caller (`"{namespace}:{key}"`). Implementations must be cheap
/// enough to call on every state change.
pub trait StateStorage: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Reads the raw document stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read. A missing key is `Ok(None)`.
    fn load(&self, key: &str) -> crate::domain::Result<Option<String>>;

    /// Replaces the document stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&self, key: &str, value: &str) -> crate::domain::Result<()>;

    /// Deletes the document stored under `key`; deleting a missing key succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> crate::domain::Result<()>;
}
