//! Connection options assembled from configuration.
//!
//! These builders never fail: each value falls back to an environment
//! variable and then to a hard default when the store has nothing usable.

use serde::Serialize;

use crate::client::ConfigClient;

/// Looks up an environment variable by name.
pub trait EnvLookup {
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

fn env_or(env: &impl EnvLookup, name: &str, default: &str) -> String {
    env.var(name).unwrap_or_else(|| default.to_string())
}

fn env_port_or(env: &impl EnvLookup, name: &str, default: u16) -> u16 {
    env.var(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

async fn string_or(client: &ConfigClient, shared: bool, key: &str, fallback: String) -> String {
    let result = if shared {
        client.get_shared(key, Some(fallback.as_str())).await
    } else {
        client.get(key, Some(fallback.as_str())).await
    };
    result.unwrap_or(fallback)
}

async fn port_or(client: &ConfigClient, shared: bool, key: &str, fallback: u16) -> u16 {
    let default = Some(i64::from(fallback));
    let result = if shared {
        client.get_shared_number(key, default).await
    } else {
        client.get_number(key, default).await
    };
    result
        .ok()
        .and_then(|n| u16::try_from(n).ok())
        .unwrap_or(fallback)
}

/// Relational database connection options, read from the service namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseOptions {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
}

impl DatabaseOptions {
    /// Loads the options using the process environment for fallbacks.
    pub async fn load(client: &ConfigClient) -> Self {
        Self::load_with(client, &ProcessEnv).await
    }

    /// Loads the options with a custom environment lookup.
    pub async fn load_with(client: &ConfigClient, env: &impl EnvLookup) -> Self {
        Self {
            host: string_or(client, false, "database/host", env_or(env, "DB_HOST", "localhost"))
                .await,
            port: port_or(client, false, "database/port", env_port_or(env, "DB_PORT", 5432)).await,
            username: string_or(
                client,
                false,
                "database/username",
                env_or(env, "DB_USERNAME", "postgres"),
            )
            .await,
            password: string_or(
                client,
                false,
                "database/password",
                env_or(env, "DB_PASSWORD", "postgres"),
            )
            .await,
            database: string_or(client, false, "database/name", env_or(env, "DB_NAME", "postgres"))
                .await,
        }
    }

    /// Returns a `postgres://` connection URL.
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

/// Cache server connection options, read from the shared namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedisOptions {
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl RedisOptions {
    /// Loads the options using the process environment for fallbacks.
    pub async fn load(client: &ConfigClient) -> Self {
        Self::load_with(client, &ProcessEnv).await
    }

    /// Loads the options with a custom environment lookup.
    pub async fn load_with(client: &ConfigClient, env: &impl EnvLookup) -> Self {
        let password = string_or(client, true, "redis/password", env_or(env, "REDIS_PASSWORD", ""))
            .await;

        Self {
            host: string_or(client, true, "redis/host", env_or(env, "REDIS_HOST", "localhost"))
                .await,
            port: port_or(client, true, "redis/port", env_port_or(env, "REDIS_PORT", 6379)).await,
            password: (!password.is_empty()).then_some(password),
        }
    }

    /// Returns a `redis://` connection URL.
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!("redis://:{}@{}:{}", password, self.host, self.port),
            None => format!("redis://{}:{}", self.host, self.port),
        }
    }
}
