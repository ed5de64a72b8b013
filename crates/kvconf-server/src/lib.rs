//! kvconf agent
//!
//! HTTP surface over a [`kvconf_consul::ConfigClient`]: value lookups,
//! cache inspection and maintenance, health and Prometheus metrics.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use server::{create_router_with_state, run_server_with_state};
pub use settings::AgentSettings;
pub use state::AppState;
