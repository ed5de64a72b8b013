use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: bool,
    pub initialized: bool,
}

/// GET /health
///
/// Siempre responde 200; el estado del store va en el body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let client = state.client();
    let store = client.health_check().await;

    Json(HealthResponse {
        status: if store { "UP" } else { "DOWN" },
        store,
        initialized: client.is_initialized(),
    })
}
