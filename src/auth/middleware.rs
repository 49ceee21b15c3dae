use crate::auth::AuthError;
use crate::types::AppError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Extracts the credential from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    authorization_credential(headers, "Bearer ")
}

/// Extracts the credential from `Authorization: ApiKey <key>`.
pub fn api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    authorization_credential(headers, "ApiKey ")
}

fn authorization_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MalformedHeader)?;

    let credential = value
        .strip_prefix(scheme)
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if credential.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(credential)
}

/// Rejects requests without a valid access token and records the caller.
pub async fn require_access_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;

    let user_id = state.access_tokens.validate(token).map_err(|e| {
        tracing::debug!(error = %e, path = %req.uri().path(), "Rejected access token");
        e
    })?;

    req.extensions_mut().insert(AuthUser(user_id));

    Ok(next.run(req).await)
}

/// Rejects webhook requests whose API key does not match the configured one.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = api_key(req.headers())?;

    if !state.api_keys.validate(provided) {
        return Err(AppError::Unauthenticated("API key does not match".to_string()));
    }

    Ok(next.run(req).await)
}

/// The user id proven by the request's access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::Unauthenticated("No authenticated user on request".to_string()))
    }
}
