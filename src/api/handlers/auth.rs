use crate::{
    api::handlers::verify_password,
    auth::{middleware::bearer_token, password::DUMMY_HASH, RefreshTokenManager},
    types::{AppError, LoginRequest, LoginResponse, RefreshResponse, Result},
    AppState,
};
use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use std::time::Duration;

/// Login with email and password
///
/// An unknown email and a wrong password get the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let invalid = || AppError::Unauthenticated("Incorrect email or password".to_string());

    let user = match state.db.get_user_by_email(&payload.email).await? {
        Some(user) => user,
        None => {
            // Same Argon2 cost as a wrong password.
            verify_password(state.passwords, payload.password, DUMMY_HASH.to_string()).await?;
            return Err(invalid());
        }
    };

    if !verify_password(state.passwords, payload.password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    // Zero or absent falls back to the configured lifetime; the codec clamps the rest.
    let ttl = match payload.expires_in_seconds {
        Some(secs) if secs > 0 => Duration::from_secs(secs),
        _ => state.config.auth.access_token_ttl(),
    };

    let token = state.access_tokens.issue(user.id, ttl)?;
    let refresh = state
        .refresh_tokens
        .issue(user.id, RefreshTokenManager::generate())
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: user.into(),
        token,
        refresh_token: refresh.token,
    }))
}

/// Exchange a refresh token for a new access token and refresh token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>> {
    let presented = bearer_token(&headers)
        .map_err(|_| AppError::Malformed("Couldn't find refresh token".to_string()))?;

    let user_id = state.refresh_tokens.resolve_user(presented).await?;
    let next = state.refresh_tokens.rotate(presented, user_id).await?;
    let token = state
        .access_tokens
        .issue(user_id, state.config.auth.access_token_ttl())?;

    Ok(Json(RefreshResponse {
        token,
        refresh_token: next.token,
    }))
}

/// Revoke a refresh token
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    let presented = bearer_token(&headers)
        .map_err(|_| AppError::Malformed("Couldn't find refresh token".to_string()))?;

    state.refresh_tokens.revoke(presented).await?;

    Ok(StatusCode::NO_CONTENT)
}
