//! Inspeccion y mantenimiento de la cache.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use super::ScopedKeyPath;
use crate::error::AppError;
use crate::state::AppState;

/// Entry cacheada, sin el valor (puede contener credenciales).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedKey {
    pub key: String,
    pub resolved_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheListResponse {
    pub count: usize,
    pub hit_rate: f64,
    pub entries: Vec<CachedKey>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub key: String,
    pub value: String,
}

/// GET /cache
pub async fn list_cache(State(state): State<AppState>) -> Json<CacheListResponse> {
    let client = state.client();
    let entries: Vec<CachedKey> = client
        .cached_entries()
        .into_iter()
        .map(|entry| CachedKey {
            key: entry.key().to_string(),
            resolved_at: entry.resolved_at_time(),
        })
        .collect();

    Json(CacheListResponse {
        count: entries.len(),
        hit_rate: client.metrics().hit_rate(),
        entries,
    })
}

/// DELETE /cache
#[instrument(skip_all)]
pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.client().clear_cache().await;

    tracing::info!(count = cleared, "Cache cleared");

    Json(ClearResponse {
        cleared,
        message: format!("Cleared {} cache entries", cleared),
    })
}

/// POST /cache/refresh/{scope}/{*key}
#[instrument(skip_all, fields(scope = %path.scope, key = %path.key))]
pub async fn refresh_key(
    State(state): State<AppState>,
    Path(path): Path<ScopedKeyPath>,
) -> Result<Json<RefreshResponse>, AppError> {
    let scope = path.scope()?;
    let client = state.client();
    let value = client.refresh_in(scope, &path.key).await?;

    Ok(Json(RefreshResponse {
        key: client.namespace().qualify(scope, &path.key),
        value,
    }))
}
