mod helpers;

use axum::http::StatusCode;
use helpers::TestApp;

#[tokio::test]
async fn health_reports_up_when_store_is_reachable() {
    let app = TestApp::new();

    let response = app.http.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body = response.json();
    assert_eq!(body["status"], "UP");
    assert_eq!(body["store"], true);
    assert_eq!(body["initialized"], false);
}

#[tokio::test]
async fn health_reports_down_with_200() {
    let app = TestApp::new();
    app.store.set_unreachable(true);

    let response = app.http.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body = response.json();
    assert_eq!(body["status"], "DOWN");
    assert_eq!(body["store"], false);
}

#[tokio::test]
async fn health_reflects_initialization() {
    let app = TestApp::new();
    app.client.initialize().await.unwrap();

    let body = app.http.get("/health").await.json();
    assert_eq!(body["initialized"], true);
}

#[tokio::test]
async fn health_returns_json() {
    let app = TestApp::new();

    let response = app.http.get("/health").await;
    let content_type = response.header("content-type").unwrap();

    assert!(content_type.contains("application/json"));
}
