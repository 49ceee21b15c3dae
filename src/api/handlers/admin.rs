use crate::{
    types::{AppError, Result},
    AppState,
};
use axum::{extract::State, http::StatusCode};

/// Delete every user, chirp and refresh token. Dev platform only.
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode> {
    if !state.config.server.is_dev() {
        return Err(AppError::Forbidden(
            "Reset is only allowed in dev environment".to_string(),
        ));
    }

    state.db.delete_all_users().await?;
    tracing::warn!("All users deleted by admin reset");

    Ok(StatusCode::OK)
}
