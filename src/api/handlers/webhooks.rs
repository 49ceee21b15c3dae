use crate::{
    types::{AppError, Result, WebhookRequest},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// The only event the payment provider sends that Chirpy acts on.
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Payment provider webhook. Other events are acknowledged and ignored.
pub async fn polka_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookRequest>,
) -> Result<StatusCode> {
    if payload.event != USER_UPGRADED_EVENT {
        tracing::debug!(event = %payload.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    if !state.db.upgrade_user(payload.data.user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %payload.data.user_id, "User upgraded to Chirpy Red");

    Ok(StatusCode::NO_CONTENT)
}
