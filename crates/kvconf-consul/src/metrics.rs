//! Metricas del cliente de configuracion.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas del cliente.
/// Llamar una vez al inicio, despues de instalar el recorder.
pub fn register_client_metrics() {
    metrics::describe_counter!("kvconf_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("kvconf_cache_misses_total", "Total number of cache misses");
    metrics::describe_gauge!("kvconf_cache_entries", "Current number of cached keys");
    metrics::describe_counter!(
        "kvconf_store_requests_total",
        "Total number of reads issued to the key-value store"
    );
    metrics::describe_histogram!(
        "kvconf_store_request_seconds",
        "Time spent reading from the key-value store"
    );
    metrics::describe_counter!(
        "kvconf_default_fallbacks_total",
        "Lookups answered with the caller supplied default"
    );
}

/// Recorder de metricas del cache.
/// Mantiene contadores atomicos propios para inspeccion en proceso.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    store_requests: Arc<AtomicU64>,
    fallbacks: Arc<AtomicU64>,
    entries: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("kvconf_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("kvconf_cache_misses_total").increment(1);
    }

    /// Registra una lectura contra el store y su resultado
    pub fn record_store_request(&self, outcome: &'static str, duration: Duration) {
        self.store_requests.fetch_add(1, Ordering::Relaxed);
        counter!("kvconf_store_requests_total", "outcome" => outcome).increment(1);
        histogram!("kvconf_store_request_seconds").record(duration.as_secs_f64());
    }

    /// Registra una respuesta servida con el default
    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
        counter!("kvconf_default_fallbacks_total").increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: u64) {
        self.entries.store(count, Ordering::Relaxed);
        gauge!("kvconf_cache_entries").set(count as f64);
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn store_requests(&self) -> u64 {
        self.store_requests.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Ultimo valor publicado en `kvconf_cache_entries`
    pub fn entries(&self) -> u64 {
        self.entries.load(Ordering::Relaxed)
    }
}
