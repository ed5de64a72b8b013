//! kvconf Core - Domain types
//!
//! This crate provides the foundational types for the kvconf configuration
//! client: the error taxonomy, namespace prefixes, resolved entries and
//! typed value parsing.

pub mod entry;
pub mod error;
pub mod namespace;
pub mod value;

pub use entry::ConfigEntry;
pub use error::{ConfigError, Result};
pub use namespace::{Namespace, Scope};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
