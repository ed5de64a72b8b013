//! # kvconf Consul client
//!
//! Consul-backed configuration client with an in-memory cache.
//!
//! ## Features
//!
//! - Service-specific (`config/<service>`) and shared (`config/shared`) namespaces
//! - Cache without expiry; defaults are returned but never cached
//! - Typed readers for strings, integers and booleans
//! - Startup preloading, per-key refresh and full cache clearing
//! - Concurrent misses for one key share a single store read
//! - Leader-endpoint liveness probe
//!
//! ## Example
//!
//! ```ignore
//! use kvconf_consul::{ConfigClient, ConsulSettings, DatabaseOptions};
//! use kvconf_core::Namespace;
//!
//! let client = ConfigClient::new(
//!     ConsulSettings::from_env()?,
//!     Namespace::for_service("carrier-service"),
//! )?;
//! client.initialize().await?;
//!
//! let port = client.get_number("port", Some(3005)).await?;
//! let database = DatabaseOptions::load(&client).await;
//! ```

pub mod builders;
pub mod client;
pub mod metrics;
pub mod settings;
pub mod store;

// Re-exports
pub use builders::{DatabaseOptions, EnvLookup, ProcessEnv, RedisOptions};
pub use client::{ConfigClient, PreloadFailure, PreloadKeys, PreloadReport};
pub use metrics::{CacheMetrics, register_client_metrics};
pub use settings::{ConsulSettings, ConsulSettingsBuilder, Scheme};
pub use store::{ConsulKvStore, KvStore, MemoryStore};

// Re-export kvconf_core for consumers
pub use kvconf_core;
