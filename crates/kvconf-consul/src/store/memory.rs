//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kvconf_core::{ConfigError, Result};
use parking_lot::RwLock;

use super::KvStore;

/// A store backed by a process-local map.
///
/// Stands in for Consul during local development and in tests. Every read is
/// counted, and the store can be switched into an unreachable mode that
/// fails reads the way a network outage would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    reads: RwLock<HashMap<String, usize>>,
    total_reads: AtomicUsize,
    unreachable: AtomicBool,
    latency: Option<Duration>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given fully qualified keys.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.values.write();
            for (k, v) in values {
                map.insert(k.into(), v.into());
            }
        }
        store
    }

    /// Adds an artificial delay to every read.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Sets a value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    /// Removes a value, returning it if present.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    /// Makes every subsequent read fail as a transport error.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Total number of reads served (or refused) so far.
    pub fn reads(&self) -> usize {
        self.total_reads.load(Ordering::SeqCst)
    }

    /// Number of reads issued for one key.
    pub fn reads_of(&self, key: &str) -> usize {
        self.reads.read().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        self.total_reads.fetch_add(1, Ordering::SeqCst);
        *self.reads.write().entry(key.to_string()).or_insert(0) += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ConfigError::unreachable(key, "memory store marked unreachable"));
        }

        Ok(self.values.read().get(key).cloned())
    }

    async fn health_check(&self) -> bool {
        !self.unreachable.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
