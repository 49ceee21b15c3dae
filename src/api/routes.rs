use crate::api::handlers::{admin, auth, chirps, health, users, webhooks};
use crate::auth::middleware::{require_access_token, require_api_key};
use crate::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the full application router with state attached.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/healthz", get(health::healthz))
        .route("/users", post(users::create_user))
        .route("/login", post(auth::login))
        // Refresh and revoke carry a refresh token, checked by the handler
        .route("/refresh", post(auth::refresh))
        .route("/revoke", post(auth::revoke))
        .route("/chirps", get(chirps::list_chirps))
        .route("/chirps/{chirp_id}", get(chirps::get_chirp));

    let protected_routes = Router::new()
        // Protected routes (access token required)
        .route("/users", put(users::update_user))
        .route("/chirps", post(chirps::create_chirp))
        .route("/chirps/{chirp_id}", delete(chirps::delete_chirp))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token,
        ));

    let webhook_routes = Router::new()
        .route("/polka/webhooks", post(webhooks::polka_webhook))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let api = public_routes.merge(protected_routes).merge(webhook_routes);

    Router::new()
        .nest("/api", api)
        .route("/admin/reset", post(admin::reset))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TursoClient;
    use crate::ChirpyConfig;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app() -> Router {
        let db = TursoClient::new_memory().await.expect("in-memory db");
        let state = AppState::new(ChirpyConfig::default(), Arc::new(db), "secret", "key");
        create_router(state)
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = app()
            .await
            .oneshot(Request::get("/api/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_without_token_is_unauthorized() {
        let request = Request::post("/api/chirps")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"body":"hello"}"#))
            .unwrap();

        let response = app().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_and_protected_methods_share_a_path() {
        // GET on the chirp path stays public while DELETE needs a token.
        let id = uuid::Uuid::new_v4();

        let get = app()
            .await
            .oneshot(
                Request::get(format!("/api/chirps/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(get.status(), StatusCode::NOT_FOUND);

        let delete = app()
            .await
            .oneshot(
                Request::delete(format!("/api/chirps/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(delete.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_requires_api_key_scheme() {
        let request = Request::post("/api/polka/webhooks")
            .header(header::AUTHORIZATION, "Bearer key")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"event":"user.upgraded","data":{"user_id":"00000000-0000-0000-0000-000000000000"}}"#))
            .unwrap();

        let response = app().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
