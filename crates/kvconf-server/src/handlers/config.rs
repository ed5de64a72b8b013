//! Lectura de valores de configuracion.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use kvconf_consul::kvconf_core::value::{parse_bool_strict, parse_number};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::ScopedKeyPath;
use crate::error::AppError;
use crate::state::AppState;

/// Tipo con el que se interpreta el valor almacenado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueKind {
    #[default]
    String,
    Number,
    Boolean,
}

impl FromStr for ValueKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            other => Err(AppError::BadRequest(format!(
                "unknown type '{}', expected string, number or boolean",
                other
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigQuery {
    pub default: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ConfigQuery {
    fn kind(&self) -> Result<ValueKind, AppError> {
        self.kind
            .as_deref()
            .map(ValueKind::from_str)
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

#[derive(Debug, Serialize)]
pub struct ValueResponse {
    pub key: String,
    pub value: Value,
}

/// GET /config/{scope}/{*key}
#[instrument(skip_all, fields(scope = %path.scope, key = %path.key))]
pub async fn get_value(
    State(state): State<AppState>,
    Path(path): Path<ScopedKeyPath>,
    Query(query): Query<ConfigQuery>,
) -> Result<Json<ValueResponse>, AppError> {
    let scope = path.scope()?;
    let kind = query.kind()?;
    let client = state.client();
    let key = client.namespace().qualify(scope, &path.key);
    let default = query.default.as_deref();

    let value = match kind {
        ValueKind::String => Value::from(client.get_in(scope, &path.key, default).await?),
        ValueKind::Number => {
            let default = default.map(|d| parse_number(&key, d)).transpose()?;
            Value::from(client.get_number_in(scope, &path.key, default).await?)
        },
        ValueKind::Boolean => {
            let default = default.map(|d| parse_bool_strict(&key, d)).transpose()?;
            Value::from(client.get_boolean_in(scope, &path.key, default).await?)
        },
    };

    Ok(Json(ValueResponse { key, value }))
}
