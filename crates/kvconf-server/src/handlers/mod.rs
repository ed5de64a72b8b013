pub mod cache;
pub mod config;
pub mod health;
pub mod metrics;

use serde::Deserialize;

use crate::error::AppError;
use kvconf_consul::kvconf_core::Scope;

/// Path `/{scope}/{*key}` compartido por lectura y refresh.
#[derive(Debug, Deserialize)]
pub struct ScopedKeyPath {
    pub scope: String,
    pub key: String,
}

impl ScopedKeyPath {
    pub(crate) fn scope(&self) -> Result<Scope, AppError> {
        self.scope
            .parse()
            .map_err(|_| AppError::BadRequest(format!("unknown scope '{}'", self.scope)))
    }
}
