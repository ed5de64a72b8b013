//! Test client helpers.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use kvconf_consul::kvconf_core::Namespace;
use kvconf_consul::{ConfigClient, KvStore, MemoryStore};
use kvconf_server::{AppState, create_router_with_state, metrics::setup::detached_handle};
use tower::ServiceExt;

/// Router de prueba respaldado por un `MemoryStore` del servicio
/// `carrier-service`.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub client: Arc<ConfigClient>,
    pub http: TestClient,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_values(Vec::<(String, String)>::new())
    }

    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Arc::new(MemoryStore::with_values(values));
        let client = Arc::new(ConfigClient::with_store(
            Arc::clone(&store) as Arc<dyn KvStore>,
            Namespace::for_service("carrier-service"),
        ));
        let router = create_router_with_state(AppState::new(Arc::clone(&client)), detached_handle());

        Self {
            store,
            client,
            http: TestClient::new(router),
        }
    }
}

/// Helper para tests de integracion HTTP.
pub struct TestClient {
    app: Router,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, Vec::new()).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.send("POST", uri, Vec::new()).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send("DELETE", uri, Vec::new()).await
    }

    /// Hace un GET request con headers personalizados.
    pub async fn get_with_headers(&self, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        self.send("GET", uri, headers).await
    }

    async fn send(&self, method: &str, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        let mut builder = Request::builder().uri(uri).method(method);

        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        let response = self
            .app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .expect("Request failed");

        TestResponse::from_response(response).await
    }
}

/// Wrapper sobre Response con helpers para assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Body is not valid UTF-8")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Verifica que el status sea el esperado.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }
}
