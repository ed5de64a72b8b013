//! Namespace prefixes for configuration keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Root segment every prefix lives under.
pub const CONFIG_ROOT: &str = "config";

/// Segment used for configuration shared between services.
pub const SHARED_SEGMENT: &str = "shared";

/// Which namespace a relative key is resolved under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Keys private to one deployable service.
    Service,
    /// Keys common to several services.
    Shared,
}

impl Scope {
    /// Returns the lowercase name of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "service" => Ok(Self::Service),
            "shared" => Ok(Self::Shared),
            other => Err(ConfigError::settings(format!("unknown scope '{other}'"))),
        }
    }
}

/// The pair of prefixes a client resolves keys under.
///
/// # Example
///
/// ```
/// use kvconf_core::{Namespace, Scope};
///
/// let ns = Namespace::for_service("carrier-service");
/// assert_eq!(ns.qualify(Scope::Service, "port"), "config/carrier-service/port");
/// assert_eq!(ns.qualify(Scope::Shared, "redis/host"), "config/shared/redis/host");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    service_prefix: String,
    shared_prefix: String,
}

impl Namespace {
    /// Creates the standard namespace for a service: `config/<service>` and
    /// `config/shared`.
    pub fn for_service(service: impl AsRef<str>) -> Self {
        Self {
            service_prefix: format!("{}/{}", CONFIG_ROOT, service.as_ref()),
            shared_prefix: format!("{}/{}", CONFIG_ROOT, SHARED_SEGMENT),
        }
    }

    /// Creates a namespace from explicit prefixes. Trailing slashes are dropped.
    pub fn new(service_prefix: impl Into<String>, shared_prefix: impl Into<String>) -> Self {
        Self {
            service_prefix: service_prefix.into().trim_end_matches('/').to_string(),
            shared_prefix: shared_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the service-specific prefix.
    pub fn service_prefix(&self) -> &str {
        &self.service_prefix
    }

    /// Returns the shared prefix.
    pub fn shared_prefix(&self) -> &str {
        &self.shared_prefix
    }

    /// Returns the prefix for the given scope.
    pub fn prefix(&self, scope: Scope) -> &str {
        match scope {
            Scope::Service => &self.service_prefix,
            Scope::Shared => &self.shared_prefix,
        }
    }

    /// Builds the fully qualified key `<prefix>/<key>`.
    ///
    /// The relative key is taken as given; it is the caller's job to pass
    /// only the suffix.
    pub fn qualify(&self, scope: Scope, key: &str) -> String {
        format!("{}/{}", self.prefix(scope), key)
    }

    /// Checks that a relative key is usable under the given scope.
    ///
    /// Rejects empty keys, keys with a leading `/`, and keys that already
    /// carry the scope's prefix.
    pub fn validate_relative(&self, scope: Scope, key: &str) -> Result<(), String> {
        if key.trim().is_empty() {
            return Err("relative key cannot be empty".to_string());
        }
        if key.starts_with('/') {
            return Err(format!("relative key '{key}' must not start with '/'"));
        }
        let prefix = self.prefix(scope);
        if key == prefix || key.starts_with(&format!("{prefix}/")) {
            return Err(format!(
                "relative key '{key}' already contains the {scope} prefix '{prefix}'"
            ));
        }
        Ok(())
    }
}
