//! Message composition endpoints: delivery and text polishing.

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use {
    herald_agents::{PolishFields, polish},
    herald_webhooks::DeliveryRequest,
    serde::Serialize,
    tracing::info,
};

use crate::{auth_middleware::AuthSession, error::ApiError, server::AppState};

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message: &'static str,
}

pub async fn send_message_handler(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    body: Result<Json<DeliveryRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, ApiError> {
    let Json(request) = body?;
    if request.channel.trim().is_empty() {
        return Err(ApiError::bad_request("Channel is required"));
    }

    state.gateway.webhooks.deliver(&request).await?;
    info!(user = %user.username, channel = %request.channel.trim(), "message sent");
    Ok(Json(SendResponse {
        success: true,
        message: "Message sent successfully",
    }))
}

pub async fn ai_improve_handler(
    State(state): State<AppState>,
    body: Result<Json<PolishFields>, JsonRejection>,
) -> Result<Json<PolishFields>, ApiError> {
    let Json(fields) = body?;
    if !fields.has_text() {
        return Err(herald_agents::Error::NothingToImprove.into());
    }
    let provider = state
        .gateway
        .llm
        .as_ref()
        .ok_or_else(|| ApiError::internal("AI text improvement is not configured"))?;

    let improved = polish(provider.as_ref(), &fields).await?;
    Ok(Json(improved))
}
