//! Shared helpers for HTTP integration tests.

use axum_test::TestServer;
use chirpy::{api::routes::create_router, AppState, ChirpyConfig, RotationPolicy, TursoClient};
use serde_json::{json, Value};
use std::sync::Arc;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const API_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";
pub const PASSWORD: &str = "04234";

pub async fn create_test_server_with(config: ChirpyConfig) -> TestServer {
    let db = TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database");
    let state = AppState::new(config, Arc::new(db), SIGNING_SECRET, API_KEY);
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

pub async fn create_test_server() -> TestServer {
    create_test_server_with(ChirpyConfig::default()).await
}

pub async fn create_test_server_with_rotation(policy: RotationPolicy) -> TestServer {
    let mut config = ChirpyConfig::default();
    config.auth.rotation_policy = policy;
    create_test_server_with(config).await
}

pub async fn create_dev_server() -> TestServer {
    let mut config = ChirpyConfig::default();
    config.server.platform = "dev".to_string();
    create_test_server_with(config).await
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Registers `email` and returns the created user.
pub async fn register(server: &TestServer, email: &str) -> Value {
    let response = server
        .post("/api/users")
        .json(&json!({ "email": email, "password": PASSWORD }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

/// Logs `email` in and returns the login body.
pub async fn login(server: &TestServer, email: &str) -> Value {
    let response = server
        .post("/api/login")
        .json(&json!({ "email": email, "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    response.json()
}

pub async fn register_and_login(server: &TestServer, email: &str) -> (String, String, String) {
    let user = register(server, email).await;
    let body = login(server, email).await;
    (
        user["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}
