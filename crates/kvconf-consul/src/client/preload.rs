//! Startup preload lists and their outcome.

use kvconf_core::{ConfigError, Namespace, Scope};
use serde::Serialize;

/// Keys resolved eagerly by `ConfigClient::initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadKeys {
    service: Vec<String>,
    shared: Vec<String>,
}

impl Default for PreloadKeys {
    fn default() -> Self {
        Self {
            service: [
                "port",
                "database/host",
                "database/port",
                "database/username",
                "database/password",
                "database/name",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            shared: ["redis/host", "redis/port"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl PreloadKeys {
    /// Creates preload lists from relative keys.
    pub fn new(service: Vec<impl Into<String>>, shared: Vec<impl Into<String>>) -> Self {
        Self {
            service: service.into_iter().map(Into::into).collect(),
            shared: shared.into_iter().map(Into::into).collect(),
        }
    }

    /// No preloading at all.
    pub fn none() -> Self {
        Self {
            service: Vec::new(),
            shared: Vec::new(),
        }
    }

    pub fn service(&self) -> &[String] {
        &self.service
    }

    pub fn shared(&self) -> &[String] {
        &self.shared
    }

    /// Total number of keys.
    pub fn len(&self) -> usize {
        self.service.len() + self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates service keys first, then shared keys.
    pub fn iter(&self) -> impl Iterator<Item = (Scope, &str)> + '_ {
        self.service
            .iter()
            .map(|k| (Scope::Service, k.as_str()))
            .chain(self.shared.iter().map(|k| (Scope::Shared, k.as_str())))
    }

    /// Checks every key against the namespace before anything is fetched.
    pub(crate) fn validate(&self, namespace: &Namespace) -> Result<(), ConfigError> {
        for (scope, key) in self.iter() {
            namespace
                .validate_relative(scope, key)
                .map_err(ConfigError::initialization)?;
        }
        Ok(())
    }
}

/// A key that could not be preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreloadFailure {
    pub key: String,
    #[serde(serialize_with = "display")]
    pub error: ConfigError,
}

fn display<S: serde::Serializer>(error: &ConfigError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of a preload pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    /// Fully qualified keys now in the cache.
    pub loaded: Vec<String>,
    /// Keys that failed, with the reason.
    pub failed: Vec<PreloadFailure>,
}

impl PreloadReport {
    pub(crate) fn record_loaded(&mut self, key: String) {
        self.loaded.push(key);
    }

    pub(crate) fn record_failure(&mut self, key: String, error: ConfigError) {
        self.failed.push(PreloadFailure { key, error });
    }

    /// True when every key was loaded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
