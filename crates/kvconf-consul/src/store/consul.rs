//! Consul KV store over HTTP.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use kvconf_core::{ConfigError, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::KvStore;
use crate::settings::ConsulSettings;

/// One element of the array returned by `GET /v1/kv/<key>`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KvPair {
    key: String,
    /// Base64 encoded; `null` when the key holds no value.
    #[serde(default)]
    value: Option<String>,
}

/// Reads configuration keys from a Consul agent.
#[derive(Clone)]
pub struct ConsulKvStore {
    client: reqwest::Client,
    settings: ConsulSettings,
}

impl ConsulKvStore {
    /// Creates a store for the given connection settings.
    ///
    /// KV reads use the settings' read timeout; the health probe overrides
    /// it per request with the shorter health timeout.
    pub fn new(settings: ConsulSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.kv_timeout())
            .build()
            .map_err(|e| ConfigError::settings(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    /// Returns the connection settings.
    pub fn settings(&self) -> &ConsulSettings {
        &self.settings
    }
}

fn decode_value(key: &str, encoded: Option<&str>) -> Result<String> {
    let Some(encoded) = encoded else {
        return Ok(String::new());
    };

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| ConfigError::invalid_response(key, format!("invalid base64 value: {e}")))?;

    String::from_utf8(bytes)
        .map_err(|e| ConfigError::invalid_response(key, format!("value is not UTF-8: {e}")))
}

#[async_trait]
impl KvStore for ConsulKvStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let url = self.settings.kv_url(key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ConfigError::unreachable(key, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(key = %key, "Key not present in Consul");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ConfigError::unreachable(
                key,
                format!("unexpected status {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ConfigError::unreachable(key, e.to_string()))?;
        if body.is_empty() {
            return Ok(None);
        }

        let pairs: Vec<KvPair> = serde_json::from_slice(&body)
            .map_err(|e| ConfigError::invalid_response(key, format!("malformed body: {e}")))?;

        match pairs.into_iter().next() {
            Some(pair) => {
                debug!(key = %pair.key, "Key resolved from Consul");
                decode_value(key, pair.value.as_deref()).map(Some)
            },
            None => Ok(None),
        }
    }

    async fn health_check(&self) -> bool {
        let result = self
            .client
            .get(self.settings.leader_url())
            .timeout(self.settings.health_timeout())
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Consul health probe failed");
                false
            },
        }
    }

    fn name(&self) -> &str {
        "consul"
    }
}

impl std::fmt::Debug for ConsulKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsulKvStore")
            .field("base_url", &self.settings.base_url())
            .finish()
    }
}
