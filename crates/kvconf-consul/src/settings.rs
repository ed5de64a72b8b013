//! Consul connection settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use config::Environment;
use kvconf_core::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read by [`ConsulSettingsBuilder::with_env`].
pub const ENV_PREFIX: &str = "CONSUL";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8500;

fn default_kv_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_health_timeout() -> Duration {
    Duration::from_secs(2)
}

/// URL scheme used to reach the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(ConfigError::settings(format!(
                "scheme must be http or https, got '{other}'"
            ))),
        }
    }
}

/// Connection settings for a Consul agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsulSettings {
    host: String,
    port: u16,
    #[serde(default)]
    scheme: Scheme,

    /// Timeout applied to KV reads.
    #[serde(default = "default_kv_timeout", with = "duration_secs")]
    kv_timeout: Duration,

    /// Timeout applied to the leader probe.
    #[serde(default = "default_health_timeout", with = "duration_secs")]
    health_timeout: Duration,
}

impl Default for ConsulSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            scheme: Scheme::default(),
            kv_timeout: default_kv_timeout(),
            health_timeout: default_health_timeout(),
        }
    }
}

impl ConsulSettings {
    /// Creates a new builder.
    pub fn builder() -> ConsulSettingsBuilder {
        ConsulSettingsBuilder::default()
    }

    /// Settings from `CONSUL_HOST`, `CONSUL_PORT` and `CONSUL_SCHEME`, with
    /// the hard defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn kv_timeout(&self) -> Duration {
        self.kv_timeout
    }

    pub fn health_timeout(&self) -> Duration {
        self.health_timeout
    }

    /// Returns `<scheme>://<host>:<port>`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Returns the KV endpoint for a fully qualified key.
    ///
    /// Each segment is percent-encoded so `#`, `?` and spaces stay part of
    /// the key instead of turning into a fragment or query string.
    pub fn kv_url(&self, key: &str) -> String {
        let path = key
            .trim_start_matches('/')
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/v1/kv/{}", self.base_url(), path)
    }

    /// Returns the leader status endpoint used as a liveness probe.
    pub fn leader_url(&self) -> String {
        format!("{}/v1/status/leader", self.base_url())
    }
}

/// Values layered from the environment on top of the hard defaults.
#[derive(Debug, Deserialize)]
struct EnvLayer {
    host: String,
    port: u16,
    scheme: String,
}

/// Builder for ConsulSettings.
///
/// Values set explicitly always win over the environment, which wins over
/// the hard defaults.
#[derive(Debug, Default)]
pub struct ConsulSettingsBuilder {
    host: Option<String>,
    port: Option<u16>,
    scheme: Option<Scheme>,
    kv_timeout: Option<Duration>,
    health_timeout: Option<Duration>,
}

impl ConsulSettingsBuilder {
    /// Sets the agent host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the agent port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the URL scheme.
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Sets the KV read timeout.
    pub fn kv_timeout(mut self, timeout: Duration) -> Self {
        self.kv_timeout = Some(timeout);
        self
    }

    /// Sets the health probe timeout.
    pub fn health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = Some(timeout);
        self
    }

    /// Fills the fields not set explicitly from `CONSUL_*` variables.
    pub fn with_env(self) -> Result<Self> {
        self.with_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Fills the fields not set explicitly from the given environment source.
    pub fn with_environment(mut self, environment: Environment) -> Result<Self> {
        let layered = config::Config::builder()
            .set_default("host", DEFAULT_HOST)
            .and_then(|b| b.set_default("port", i64::from(DEFAULT_PORT)))
            .and_then(|b| b.set_default("scheme", Scheme::default().as_str()))
            .map_err(settings_error)?
            .add_source(environment.try_parsing(true))
            .build()
            .map_err(settings_error)?;

        let env: EnvLayer = layered.try_deserialize().map_err(settings_error)?;

        if self.host.is_none() {
            self.host = Some(env.host);
        }
        if self.port.is_none() {
            self.port = Some(env.port);
        }
        if self.scheme.is_none() {
            self.scheme = Some(env.scheme.parse()?);
        }

        Ok(self)
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettings` if the host is empty or the port is zero.
    pub fn build(self) -> Result<ConsulSettings> {
        let host = self.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        if host.trim().is_empty() {
            return Err(ConfigError::settings("host cannot be empty"));
        }

        let port = self.port.unwrap_or(DEFAULT_PORT);
        if port == 0 {
            return Err(ConfigError::settings("port must be greater than zero"));
        }

        Ok(ConsulSettings {
            host,
            port,
            scheme: self.scheme.unwrap_or_default(),
            kv_timeout: self.kv_timeout.unwrap_or_else(default_kv_timeout),
            health_timeout: self.health_timeout.unwrap_or_else(default_health_timeout),
        })
    }
}

fn settings_error(err: config::ConfigError) -> ConfigError {
    ConfigError::settings(err.to_string())
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let mut map = config::Map::new();
        for (k, v) in vars {
            map.insert(k.to_string(), v.to_string());
        }
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = ConsulSettings::builder().build().unwrap();

        assert_eq!(settings.host(), "localhost");
        assert_eq!(settings.port(), 8500);
        assert_eq!(settings.scheme(), Scheme::Http);
        assert_eq!(settings.kv_timeout(), Duration::from_secs(5));
        assert_eq!(settings.health_timeout(), Duration::from_secs(2));
        assert_eq!(settings, ConsulSettings::default());
    }

    #[test]
    fn test_urls() {
        let settings = ConsulSettings::builder()
            .host("consul.internal")
            .port(8501)
            .scheme(Scheme::Https)
            .build()
            .unwrap();

        assert_eq!(settings.base_url(), "https://consul.internal:8501");
        assert_eq!(
            settings.kv_url("config/shared/redis/host"),
            "https://consul.internal:8501/v1/kv/config/shared/redis/host"
        );
        assert_eq!(
            settings.leader_url(),
            "https://consul.internal:8501/v1/status/leader"
        );
    }

    #[test]
    fn test_kv_url_encodes_segments() {
        let settings = ConsulSettings::default();

        assert_eq!(
            settings.kv_url("config/carrier-service/feature#beta"),
            "http://localhost:8500/v1/kv/config/carrier-service/feature%23beta"
        );
        assert_eq!(
            settings.kv_url("config/carrier-service/feature?recurse=true"),
            "http://localhost:8500/v1/kv/config/carrier-service/feature%3Frecurse%3Dtrue"
        );
        assert_eq!(
            settings.kv_url("/config/shared/log level"),
            "http://localhost:8500/v1/kv/config/shared/log%20level"
        );
    }

    #[test]
    fn test_environment_fills_unset_fields() {
        let settings = ConsulSettings::builder()
            .with_environment(env(&[
                ("CONSUL_HOST", "consul.svc"),
                ("CONSUL_PORT", "9500"),
                ("CONSUL_SCHEME", "HTTPS"),
            ]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.host(), "consul.svc");
        assert_eq!(settings.port(), 9500);
        assert_eq!(settings.scheme(), Scheme::Https);
    }

    #[test]
    fn test_explicit_values_win_over_environment() {
        let settings = ConsulSettings::builder()
            .host("explicit-host")
            .with_environment(env(&[("CONSUL_HOST", "env-host"), ("CONSUL_PORT", "9500")]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.host(), "explicit-host");
        assert_eq!(settings.port(), 9500);
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let settings = ConsulSettings::builder()
            .with_environment(env(&[]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.base_url(), "http://localhost:8500");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = ConsulSettings::builder().with_environment(env(&[("CONSUL_SCHEME", "ftp")]));

        assert!(matches!(result, Err(ConfigError::InvalidSettings(_))));
    }

    #[test]
    fn test_invalid_port() {
        assert!(ConsulSettings::builder().port(0).build().is_err());
        assert!(ConsulSettings::builder().host("  ").build().is_err());
    }
}
