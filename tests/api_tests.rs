mod common;

use axum::http::StatusCode;
use chirpy::RotationPolicy;
use common::*;
use serde_json::json;

// ============= Health =============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;

    let response = server.get("/api/healthz").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

// ============= Users =============

#[tokio::test]
async fn test_register_user() {
    let server = create_test_server().await;

    let user = register(&server, "walt@breakingbad.com").await;

    assert_eq!(user["email"], "walt@breakingbad.com");
    assert_eq!(user["is_chirpy_red"], false);
    assert!(user["id"].is_string());
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_user() {
    let server = create_test_server().await;
    register(&server, "dup@example.com").await;

    let response = server
        .post("/api/users")
        .json(&json!({ "email": "dup@example.com", "password": "other" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_register_requires_password() {
    let server = create_test_server().await;

    let response = server
        .post("/api/users")
        .json(&json!({ "email": "nopass@example.com", "password": "" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_update_user() {
    let server = create_test_server().await;
    let (user_id, token, _) = register_and_login(&server, "before@example.com").await;

    let response = server
        .put("/api/users")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "email": "after@example.com", "password": "new-password" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], user_id);
    assert_eq!(body["email"], "after@example.com");

    // Old password no longer works, new one does
    server
        .post("/api/login")
        .json(&json!({ "email": "after@example.com", "password": PASSWORD }))
        .await
        .assert_status_unauthorized();
    server
        .post("/api/login")
        .json(&json!({ "email": "after@example.com", "password": "new-password" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_update_user_requires_access_token() {
    let server = create_test_server().await;

    let response = server
        .put("/api/users")
        .json(&json!({ "email": "x@example.com", "password": "x" }))
        .await;

    response.assert_status_unauthorized();
}

// ============= Login =============

#[tokio::test]
async fn test_login_returns_user_and_tokens() {
    let server = create_test_server().await;
    let user = register(&server, "saul@bettercall.com").await;

    let body = login(&server, "saul@bettercall.com").await;

    assert_eq!(body["id"], user["id"]);
    assert_eq!(body["email"], "saul@bettercall.com");
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    assert_eq!(body["refresh_token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let server = create_test_server().await;
    register(&server, "real@example.com").await;

    let wrong_password = server
        .post("/api/login")
        .json(&json!({ "email": "real@example.com", "password": "wrong" }))
        .await;
    let unknown_email = server
        .post("/api/login")
        .json(&json!({ "email": "ghost@example.com", "password": PASSWORD }))
        .await;

    wrong_password.assert_status_unauthorized();
    unknown_email.assert_status_unauthorized();
    assert_eq!(wrong_password.text(), unknown_email.text());
}

#[tokio::test]
async fn test_login_with_custom_expiry_is_accepted() {
    let server = create_test_server().await;
    register(&server, "short@example.com").await;

    let response = server
        .post("/api/login")
        .json(&json!({
            "email": "short@example.com",
            "password": PASSWORD,
            "expires_in_seconds": 999_999
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    // Clamped, still usable
    server
        .post("/api/chirps")
        .add_header("Authorization", bearer(body["token"].as_str().unwrap()))
        .json(&json!({ "body": "hello" }))
        .await
        .assert_status(StatusCode::CREATED);
}

// ============= Refresh / Revoke =============

#[tokio::test]
async fn test_full_credential_lifecycle() {
    let server = create_test_server().await;
    let (_, access, refresh) = register_and_login(&server, "cycle@example.com").await;

    // Access token works on a protected route
    server
        .post("/api/chirps")
        .add_header("Authorization", bearer(&access))
        .json(&json!({ "body": "first" }))
        .await
        .assert_status(StatusCode::CREATED);

    // Refresh yields a fresh pair
    let response = server
        .post("/api/refresh")
        .add_header("Authorization", bearer(&refresh))
        .await;
    response.assert_status_ok();
    let pair: serde_json::Value = response.json();
    let new_access = pair["token"].as_str().unwrap().to_string();
    let new_refresh = pair["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, refresh);

    server
        .post("/api/chirps")
        .add_header("Authorization", bearer(&new_access))
        .json(&json!({ "body": "second" }))
        .await
        .assert_status(StatusCode::CREATED);

    // Revoke the new refresh token, then it no longer works
    server
        .post("/api/revoke")
        .add_header("Authorization", bearer(&new_refresh))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .post("/api/refresh")
        .add_header("Authorization", bearer(&new_refresh))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_refresh_retains_previous_token_by_default() {
    let server = create_test_server().await;
    let (_, _, refresh) = register_and_login(&server, "retain@example.com").await;

    for _ in 0..2 {
        server
            .post("/api/refresh")
            .add_header("Authorization", bearer(&refresh))
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn test_refresh_revoke_previous_policy() {
    let server = create_test_server_with_rotation(RotationPolicy::RevokePrevious).await;
    let (_, _, refresh) = register_and_login(&server, "single@example.com").await;

    let response = server
        .post("/api/refresh")
        .add_header("Authorization", bearer(&refresh))
        .await;
    response.assert_status_ok();
    let pair: serde_json::Value = response.json();

    server
        .post("/api/refresh")
        .add_header("Authorization", bearer(&refresh))
        .await
        .assert_status_unauthorized();

    server
        .post("/api/refresh")
        .add_header("Authorization", bearer(pair["refresh_token"].as_str().unwrap()))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_refresh_with_unknown_token() {
    let server = create_test_server().await;

    server
        .post("/api/refresh")
        .add_header("Authorization", bearer("not-a-real-token"))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_refresh_without_header_is_bad_request() {
    let server = create_test_server().await;

    server.post("/api/refresh").await.assert_status_bad_request();
    server.post("/api/revoke").await.assert_status_bad_request();
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let server = create_test_server().await;
    let (_, access, _) = register_and_login(&server, "mixup@example.com").await;

    server
        .post("/api/refresh")
        .add_header("Authorization", bearer(&access))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let server = create_test_server().await;
    let (_, _, refresh) = register_and_login(&server, "mixup2@example.com").await;

    server
        .post("/api/chirps")
        .add_header("Authorization", bearer(&refresh))
        .json(&json!({ "body": "nope" }))
        .await
        .assert_status_unauthorized();
}

// ============= Chirps =============

#[tokio::test]
async fn test_chirp_is_redacted() {
    let server = create_test_server().await;
    let (user_id, token, _) = register_and_login(&server, "clean@example.com").await;

    let response = server
        .post("/api/chirps")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "body": "I had something interesting to say about Kerfuffle" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let chirp: serde_json::Value = response.json();

    assert_eq!(chirp["body"], "I had something interesting to say about ****");
    assert_eq!(chirp["user_id"], user_id);
}

#[tokio::test]
async fn test_chirp_too_long() {
    let server = create_test_server().await;
    let (_, token, _) = register_and_login(&server, "long@example.com").await;

    let response = server
        .post("/api/chirps")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "body": "a".repeat(141) }))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Chirp is too long");
}

#[tokio::test]
async fn test_list_and_get_chirps() {
    let server = create_test_server().await;
    let (_, token, _) = register_and_login(&server, "lister@example.com").await;

    let mut ids = Vec::new();
    for body in ["one", "two", "three"] {
        let response = server
            .post("/api/chirps")
            .add_header("Authorization", bearer(&token))
            .json(&json!({ "body": body }))
            .await;
        let chirp: serde_json::Value = response.json();
        ids.push(chirp["id"].as_str().unwrap().to_string());
    }

    let response = server.get("/api/chirps").await;
    response.assert_status_ok();
    let chirps: Vec<serde_json::Value> = response.json();
    let bodies: Vec<&str> = chirps.iter().map(|c| c["body"].as_str().unwrap()).collect();
    assert_eq!(bodies, vec!["one", "two", "three"]);

    let response = server.get(&format!("/api/chirps/{}", ids[1])).await;
    response.assert_status_ok();
    let chirp: serde_json::Value = response.json();
    assert_eq!(chirp["body"], "two");

    server
        .get(&format!("/api/chirps/{}", uuid::Uuid::new_v4()))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_chirp_ownership() {
    let server = create_test_server().await;
    let (_, owner_token, _) = register_and_login(&server, "owner@example.com").await;
    let (_, other_token, _) = register_and_login(&server, "other@example.com").await;

    let response = server
        .post("/api/chirps")
        .add_header("Authorization", bearer(&owner_token))
        .json(&json!({ "body": "mine" }))
        .await;
    let chirp: serde_json::Value = response.json();
    let path = format!("/api/chirps/{}", chirp["id"].as_str().unwrap());

    server
        .delete(&path)
        .add_header("Authorization", bearer(&other_token))
        .await
        .assert_status_forbidden();

    server
        .delete(&path)
        .add_header("Authorization", bearer(&owner_token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server.get(&path).await.assert_status_not_found();

    server
        .delete(&path)
        .add_header("Authorization", bearer(&owner_token))
        .await
        .assert_status_not_found();
}

// ============= Webhooks =============

#[tokio::test]
async fn test_webhook_upgrades_user() {
    let server = create_test_server().await;
    let (user_id, _, _) = register_and_login(&server, "red@example.com").await;

    server
        .post("/api/polka/webhooks")
        .add_header("Authorization", format!("ApiKey {}", API_KEY))
        .json(&json!({ "event": "user.upgraded", "data": { "user_id": user_id } }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let body = login(&server, "red@example.com").await;
    assert_eq!(body["is_chirpy_red"], true);
}

#[tokio::test]
async fn test_webhook_wrong_key() {
    let server = create_test_server().await;
    let (user_id, _, _) = register_and_login(&server, "notred@example.com").await;

    server
        .post("/api/polka/webhooks")
        .add_header("Authorization", "ApiKey wrong-key")
        .json(&json!({ "event": "user.upgraded", "data": { "user_id": user_id } }))
        .await
        .assert_status_unauthorized();

    server
        .post("/api/polka/webhooks")
        .json(&json!({ "event": "user.upgraded", "data": { "user_id": user_id } }))
        .await
        .assert_status_unauthorized();

    let body = login(&server, "notred@example.com").await;
    assert_eq!(body["is_chirpy_red"], false);
}

#[tokio::test]
async fn test_webhook_ignores_other_events() {
    let server = create_test_server().await;

    server
        .post("/api/polka/webhooks")
        .add_header("Authorization", format!("ApiKey {}", API_KEY))
        .json(&json!({ "event": "user.payment_failed", "data": { "user_id": uuid::Uuid::new_v4() } }))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_webhook_unknown_user() {
    let server = create_test_server().await;

    server
        .post("/api/polka/webhooks")
        .add_header("Authorization", format!("ApiKey {}", API_KEY))
        .json(&json!({ "event": "user.upgraded", "data": { "user_id": uuid::Uuid::new_v4() } }))
        .await
        .assert_status_not_found();
}

// ============= Admin =============

#[tokio::test]
async fn test_reset_forbidden_outside_dev() {
    let server = create_test_server().await;

    server.post("/admin/reset").await.assert_status_forbidden();
}

#[tokio::test]
async fn test_reset_in_dev_clears_users() {
    let server = create_dev_server().await;
    let (_, _, refresh) = register_and_login(&server, "gone@example.com").await;

    server.post("/admin/reset").await.assert_status_ok();

    server
        .post("/api/login")
        .json(&json!({ "email": "gone@example.com", "password": PASSWORD }))
        .await
        .assert_status_unauthorized();
    server
        .post("/api/refresh")
        .add_header("Authorization", bearer(&refresh))
        .await
        .assert_status_unauthorized();

    // Email is free again
    register(&server, "gone@example.com").await;
}
