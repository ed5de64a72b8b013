//! Application state.

use std::sync::Arc;

use kvconf_consul::ConfigClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The configuration client, built once at startup.
    client: Arc<ConfigClient>,
}

impl AppState {
    /// Creates a new AppState around a shared client.
    pub fn new(client: Arc<ConfigClient>) -> Self {
        Self { client }
    }

    /// Returns a reference to the configuration client.
    pub fn client(&self) -> &ConfigClient {
        self.client.as_ref()
    }
}
