//! Key-value store trait definition.

use async_trait::async_trait;
use kvconf_core::Result;

/// A read-only key-value store holding configuration values.
///
/// This trait abstracts over the backend so the client can cache and type
/// values without knowing how they are fetched.
///
/// # Implementors
///
/// - `ConsulKvStore` - Reads keys over the Consul HTTP API
/// - `MemoryStore` - In-process map for local development and tests
///
/// # Example
///
/// ```ignore
/// use kvconf_consul::KvStore;
///
/// struct Fixed;
///
/// #[async_trait]
/// impl KvStore for Fixed {
///     async fn read(&self, _key: &str) -> Result<Option<String>> {
///         Ok(Some("3005".to_string()))
///     }
///
///     async fn health_check(&self) -> bool {
///         true
///     }
///
///     fn name(&self) -> &str {
///         "fixed"
///     }
/// }
/// ```
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads the value stored under a fully qualified key.
    ///
    /// # Returns
    ///
    /// `Ok(Some(value))` when the key exists, `Ok(None)` when it does not.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Unreachable` if the store could not be contacted
    /// - `ConfigError::InvalidResponse` if the payload could not be decoded
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Liveness probe. Never fails; any problem reads as `false`.
    async fn health_check(&self) -> bool;

    /// Returns the name of this store, for logging.
    fn name(&self) -> &str;
}
