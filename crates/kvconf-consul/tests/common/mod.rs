//! Fake Consul agent para tests de integracion.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use kvconf_consul::ConsulSettings;
use parking_lot::Mutex;
use serde_json::json;

/// Estado compartido del agente falso.
#[derive(Default)]
pub struct FakeState {
    values: Mutex<HashMap<String, Option<String>>>,
    raw_bodies: Mutex<HashMap<String, String>>,
    kv_requests: AtomicUsize,
    failing: AtomicBool,
    no_leader: AtomicBool,
    slow_leader: AtomicBool,
}

/// Agente Consul falso escuchando en un puerto efimero.
pub struct FakeConsul {
    pub addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeConsul {
    /// Levanta el servidor en 127.0.0.1 con puerto aleatorio.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());

        let app = Router::new()
            .route("/v1/kv/{*key}", get(kv_handler))
            .route("/v1/status/leader", get(leader_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake consul");
        let addr = listener.local_addr().expect("no local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake consul crashed");
        });

        Self { addr, state }
    }

    /// Settings apuntando a este agente.
    pub fn settings(&self) -> ConsulSettings {
        ConsulSettings::builder()
            .host("127.0.0.1")
            .port(self.addr.port())
            .health_timeout(Duration::from_millis(200))
            .build()
            .expect("valid settings")
    }

    pub fn put(&self, key: &str, value: &str) {
        self.state
            .values
            .lock()
            .insert(key.to_string(), Some(value.to_string()));
    }

    /// Key existente sin valor (`"Value": null`).
    pub fn put_null(&self, key: &str) {
        self.state.values.lock().insert(key.to_string(), None);
    }

    /// Responde un body arbitrario para la key.
    pub fn put_raw(&self, key: &str, body: &str) {
        self.state
            .raw_bodies
            .lock()
            .insert(key.to_string(), body.to_string());
    }

    pub fn kv_requests(&self) -> usize {
        self.state.kv_requests.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_no_leader(&self, no_leader: bool) {
        self.state.no_leader.store(no_leader, Ordering::SeqCst);
    }

    pub fn set_slow_leader(&self, slow: bool) {
        self.state.slow_leader.store(slow, Ordering::SeqCst);
    }
}

async fn kv_handler(State(state): State<Arc<FakeState>>, Path(key): Path<String>) -> Response {
    state.kv_requests.fetch_add(1, Ordering::SeqCst);

    if state.failing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "rpc error").into_response();
    }

    if let Some(body) = state.raw_bodies.lock().get(&key).cloned() {
        return (StatusCode::OK, body).into_response();
    }

    let value = state.values.lock().get(&key).cloned();
    match value {
        Some(value) => Json(json!([{
            "LockIndex": 0,
            "Key": key,
            "Flags": 0,
            "Value": value.map(|v| STANDARD.encode(v)),
            "CreateIndex": 7,
            "ModifyIndex": 7
        }]))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn leader_handler(State(state): State<Arc<FakeState>>) -> Response {
    if state.slow_leader.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    if state.no_leader.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "No cluster leader").into_response();
    }

    Json("127.0.0.1:8300").into_response()
}

/// Un puerto local donde nadie escucha.
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    port
}
