//! Caching configuration client.
//!
//! [`ConfigClient`] resolves relative keys under the service or shared
//! prefix, caches every value the store returns and exposes typed readers
//! that tolerate a caller supplied default.
//!
//! Resolution of a fully qualified key:
//!
//! 1. A cached entry is returned as is; entries never expire.
//! 2. Otherwise the store is read. Concurrent misses for the same key share
//!    one in-flight read.
//! 3. A value found in the store is cached and returned.
//! 4. An absent key or a failed read returns the default when one was given,
//!    without caching it, so the next call asks the store again.
//! 5. Without a default the error reaches the caller.

mod preload;

pub use preload::{PreloadFailure, PreloadKeys, PreloadReport};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use kvconf_core::{ConfigEntry, ConfigError, Namespace, Result, Scope, value};
use moka::future::Cache;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::metrics::CacheMetrics;
use crate::settings::ConsulSettings;
use crate::store::{ConsulKvStore, KvStore};

/// Configuration client with an in-memory cache.
///
/// Build one per process and share it behind an `Arc`.
///
/// # Examples
///
/// ```no_run
/// use kvconf_consul::{ConfigClient, ConsulSettings};
/// use kvconf_core::Namespace;
///
/// # #[tokio::main]
/// # async fn main() -> kvconf_core::Result<()> {
/// let client = ConfigClient::new(
///     ConsulSettings::from_env()?,
///     Namespace::for_service("carrier-service"),
/// )?;
/// client.initialize().await?;
///
/// let port = client.get_number("port", Some(3000)).await?;
/// let redis = client.get_shared("redis/host", Some("localhost")).await?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigClient {
    store: Arc<dyn KvStore>,
    namespace: Namespace,
    preload: PreloadKeys,
    cache: Cache<String, Arc<ConfigEntry>>,
    initialized: AtomicBool,
    init_lock: tokio::sync::Mutex<()>,
    last_preload: RwLock<Option<PreloadReport>>,
    metrics: CacheMetrics,
}

impl ConfigClient {
    /// Creates a client reading from Consul.
    pub fn new(settings: ConsulSettings, namespace: Namespace) -> Result<Self> {
        let store = ConsulKvStore::new(settings)?;
        Ok(Self::with_store(Arc::new(store), namespace))
    }

    /// Creates a client reading from an arbitrary store.
    pub fn with_store(store: Arc<dyn KvStore>, namespace: Namespace) -> Self {
        Self {
            store,
            namespace,
            preload: PreloadKeys::default(),
            // No TTL and no capacity bound: entries live until cleared
            cache: Cache::builder().build(),
            initialized: AtomicBool::new(false),
            init_lock: tokio::sync::Mutex::new(()),
            last_preload: RwLock::new(None),
            metrics: CacheMetrics::new(),
        }
    }

    /// Replaces the keys preloaded by [`initialize`](Self::initialize).
    pub fn with_preload(mut self, preload: PreloadKeys) -> Self {
        self.preload = preload;
        self
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn preload_keys(&self) -> &PreloadKeys {
        &self.preload
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Name of the underlying store.
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Report of the preload pass, once `initialize` has run.
    pub fn last_preload(&self) -> Option<PreloadReport> {
        self.last_preload.read().clone()
    }

    // ============================================
    // Initialization
    // ============================================

    /// Warms the cache with the preload lists.
    ///
    /// Keys are fetched one after the other, service keys first. A key that
    /// fails is logged and recorded in the report; the remaining keys are
    /// still fetched and the client ends up initialized either way. A second
    /// call does nothing and returns the first report.
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if a preload key is malformed (empty, leading
    /// `/`, or already carrying the prefix). Nothing is fetched in that case.
    pub async fn initialize(&self) -> Result<PreloadReport> {
        let _guard = self.init_lock.lock().await;

        if self.is_initialized() {
            info!("Configuration client already initialized, skipping preload");
            return Ok(self.last_preload().unwrap_or_default());
        }

        self.preload.validate(&self.namespace)?;

        info!(
            service_prefix = %self.namespace.service_prefix(),
            shared_prefix = %self.namespace.shared_prefix(),
            keys = self.preload.len(),
            "Initializing configuration client"
        );

        let mut report = PreloadReport::default();
        for (scope, key) in self.preload.iter() {
            let full_key = self.namespace.qualify(scope, key);
            match self.resolve(&full_key, None).await {
                Ok(_) => report.record_loaded(full_key),
                Err(error) => {
                    warn!(key = %full_key, error = %error, "Failed to preload configuration key");
                    report.record_failure(full_key, error);
                },
            }
        }

        *self.last_preload.write() = Some(report.clone());
        self.initialized.store(true, Ordering::Release);

        info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "Configuration client initialized"
        );

        Ok(report)
    }

    // ============================================
    // String readers
    // ============================================

    /// Reads `<service_prefix>/<key>`.
    pub async fn get(&self, key: &str, default: Option<&str>) -> Result<String> {
        self.get_in(Scope::Service, key, default).await
    }

    /// Reads `<shared_prefix>/<key>`.
    pub async fn get_shared(&self, key: &str, default: Option<&str>) -> Result<String> {
        self.get_in(Scope::Shared, key, default).await
    }

    /// Reads a relative key under the given scope.
    pub async fn get_in(&self, scope: Scope, key: &str, default: Option<&str>) -> Result<String> {
        let full_key = self.namespace.qualify(scope, key);
        self.resolve(&full_key, default).await
    }

    // ============================================
    // Typed readers
    // ============================================

    /// Reads a base-10 integer from the service namespace.
    ///
    /// A malformed value yields `default` when given, else `InvalidNumber`.
    pub async fn get_number(&self, key: &str, default: Option<i64>) -> Result<i64> {
        self.get_number_in(Scope::Service, key, default).await
    }

    /// Reads a base-10 integer from the shared namespace.
    pub async fn get_shared_number(&self, key: &str, default: Option<i64>) -> Result<i64> {
        self.get_number_in(Scope::Shared, key, default).await
    }

    pub async fn get_number_in(
        &self,
        scope: Scope,
        key: &str,
        default: Option<i64>,
    ) -> Result<i64> {
        let full_key = self.namespace.qualify(scope, key);
        let fallback = default.map(|d| d.to_string());
        let raw = self.resolve(&full_key, fallback.as_deref()).await?;
        value::parse_number_or(&full_key, &raw, default)
    }

    /// Reads a boolean from the service namespace.
    ///
    /// True only when the value is `"true"` in any case; every other value,
    /// typos included, reads as false. See [`get_boolean_strict`](Self::get_boolean_strict).
    pub async fn get_boolean(&self, key: &str, default: Option<bool>) -> Result<bool> {
        self.get_boolean_in(Scope::Service, key, default).await
    }

    /// Lenient boolean from the shared namespace.
    pub async fn get_shared_boolean(&self, key: &str, default: Option<bool>) -> Result<bool> {
        self.get_boolean_in(Scope::Shared, key, default).await
    }

    pub async fn get_boolean_in(
        &self,
        scope: Scope,
        key: &str,
        default: Option<bool>,
    ) -> Result<bool> {
        let full_key = self.namespace.qualify(scope, key);
        let fallback = default.map(|d| d.to_string());
        let raw = self.resolve(&full_key, fallback.as_deref()).await?;
        Ok(value::parse_bool_lenient(&raw))
    }

    /// Reads a boolean that must be `true` or `false`.
    ///
    /// Anything else yields `default` when given, else `InvalidBoolean`.
    pub async fn get_boolean_strict(&self, key: &str, default: Option<bool>) -> Result<bool> {
        self.get_boolean_strict_in(Scope::Service, key, default)
            .await
    }

    pub async fn get_shared_boolean_strict(
        &self,
        key: &str,
        default: Option<bool>,
    ) -> Result<bool> {
        self.get_boolean_strict_in(Scope::Shared, key, default)
            .await
    }

    pub async fn get_boolean_strict_in(
        &self,
        scope: Scope,
        key: &str,
        default: Option<bool>,
    ) -> Result<bool> {
        let full_key = self.namespace.qualify(scope, key);
        let fallback = default.map(|d| d.to_string());
        let raw = self.resolve(&full_key, fallback.as_deref()).await?;
        value::parse_bool_strict_or(&full_key, &raw, default)
    }

    // ============================================
    // Cache maintenance
    // ============================================

    /// Drops the cached service key and reads it again from the store.
    pub async fn refresh(&self, key: &str) -> Result<String> {
        self.refresh_in(Scope::Service, key).await
    }

    /// Drops the cached shared key and reads it again from the store.
    pub async fn refresh_shared(&self, key: &str) -> Result<String> {
        self.refresh_in(Scope::Shared, key).await
    }

    pub async fn refresh_in(&self, scope: Scope, key: &str) -> Result<String> {
        let full_key = self.namespace.qualify(scope, key);
        self.cache.invalidate(&full_key).await;

        info!(key = %full_key, "Refreshing configuration key");
        self.resolve(&full_key, None).await
    }

    /// Empties the cache, returning how many entries were dropped.
    pub async fn clear_cache(&self) -> usize {
        let count = self.cache.iter().count();
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        self.metrics.update_entry_count(0);

        info!(count = count, "Configuration cache cleared");
        count
    }

    /// Fully qualified keys currently cached, sorted.
    pub fn cached_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.cache.iter().map(|(key, _)| key.to_string()).collect();
        keys.sort();
        keys
    }

    /// Cached entries with their resolution time, sorted by key.
    pub fn cached_entries(&self) -> Vec<ConfigEntry> {
        let mut entries: Vec<ConfigEntry> = self
            .cache
            .iter()
            .map(|(_, entry)| entry.as_ref().clone())
            .collect();
        entries.sort_by(|a, b| a.key().cmp(b.key()));
        entries
    }

    /// Liveness probe of the store. Never touches the cache.
    pub async fn health_check(&self) -> bool {
        let healthy = self.store.health_check().await;
        debug!(store = self.store.name(), healthy = healthy, "Store health probe");
        healthy
    }

    // ============================================
    // Resolution
    // ============================================

    async fn resolve(&self, full_key: &str, default: Option<&str>) -> Result<String> {
        if let Some(entry) = self.cache.get(full_key).await {
            self.metrics.record_hit();
            debug!(key = %full_key, "Configuration cache hit");
            return Ok(entry.value().to_string());
        }

        self.metrics.record_miss();

        let store = Arc::clone(&self.store);
        let metrics = self.metrics.clone();
        let key = full_key.to_string();

        let fetched = self
            .cache
            .try_get_with(full_key.to_string(), async move {
                debug!(key = %key, store = store.name(), "Reading configuration key from store");

                let start = Instant::now();
                let outcome = store.read(&key).await;
                metrics.record_store_request(outcome_label(&outcome), start.elapsed());

                match outcome {
                    Ok(Some(value)) => Ok(Arc::new(ConfigEntry::new(key, value))),
                    Ok(None) => Err(ConfigError::not_found(key)),
                    Err(error) => Err(error),
                }
            })
            .await;

        self.metrics
            .update_entry_count(self.cache.iter().count() as u64);

        match fetched {
            Ok(entry) => Ok(entry.value().to_string()),
            Err(error) => {
                let error = Arc::unwrap_or_clone(error);
                match default {
                    Some(fallback) => {
                        self.metrics.record_fallback();
                        warn!(
                            key = %full_key,
                            error = %error,
                            default = %fallback,
                            "Using default configuration value"
                        );
                        Ok(fallback.to_string())
                    },
                    None => Err(error),
                }
            },
        }
    }
}

fn outcome_label(outcome: &Result<Option<String>>) -> &'static str {
    match outcome {
        Ok(Some(_)) => "found",
        Ok(None) => "not_found",
        Err(_) => "error",
    }
}

impl std::fmt::Debug for ConfigClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigClient")
            .field("store", &self.store.name())
            .field("namespace", &self.namespace)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
