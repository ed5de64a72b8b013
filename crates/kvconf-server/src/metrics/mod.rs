//! Metrics module for the kvconf agent.

pub mod http;
pub mod setup;

pub use setup::init_metrics;
