use crate::{
    api::handlers::hash_password,
    auth::middleware::AuthUser,
    types::{AppError, CreateUserRequest, Result, UpdateUserRequest, UserResponse},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

fn require_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Malformed(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

/// Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    require_credentials(&payload.email, &payload.password)?;

    if state
        .db
        .get_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Malformed("User already exists".to_string()));
    }

    let password_hash = hash_password(state.passwords, payload.password).await?;
    let user = state.db.create_user(&payload.email, &password_hash).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Update the caller's email and password
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    require_credentials(&payload.email, &payload.password)?;

    if let Some(existing) = state.db.get_user_by_email(&payload.email).await? {
        if existing.id != user_id {
            return Err(AppError::Malformed("Email already in use".to_string()));
        }
    }

    let password_hash = hash_password(state.passwords, payload.password).await?;
    let user = state
        .db
        .update_user(user_id, &payload.email, &password_hash)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
