//! Configuracion del agente, leida de variables `KVCONF_*`.

use std::net::{IpAddr, SocketAddr};

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "KVCONF";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentSettings {
    /// Interfaz de escucha
    pub host: IpAddr,
    /// Puerto HTTP
    pub port: u16,
    /// Servicio cuyo namespace se expone
    pub service: String,
}

impl AgentSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Carga la configuracion desde una fuente de entorno arbitraria.
    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8899_i64)?
            .set_default("service", "kvconf-agent")?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
