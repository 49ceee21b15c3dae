use crate::{
    auth::middleware::AuthUser,
    types::{AppError, Chirp, CreateChirpRequest, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

/// List all chirps, oldest first
pub async fn list_chirps(State(state): State<AppState>) -> Result<Json<Vec<Chirp>>> {
    Ok(Json(state.db.list_chirps().await?))
}

/// Get a single chirp
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<Uuid>,
) -> Result<Json<Chirp>> {
    state
        .db
        .get_chirp(chirp_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Chirp not found".to_string()))
}

/// Post a chirp as the authenticated user
pub async fn create_chirp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateChirpRequest>,
) -> Result<(StatusCode, Json<Chirp>)> {
    let body = state.content_guard.check(&payload.body)?;
    let chirp = state.db.create_chirp(user_id, &body).await?;

    Ok((StatusCode::CREATED, Json(chirp)))
}

/// Delete one of the caller's chirps
pub async fn delete_chirp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(chirp_id): Path<Uuid>,
) -> Result<StatusCode> {
    let chirp = state
        .db
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chirp not found".to_string()))?;

    if chirp.user_id != user_id {
        return Err(AppError::Forbidden(
            "You can't delete this chirp".to_string(),
        ));
    }

    state.db.delete_chirp(chirp_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
