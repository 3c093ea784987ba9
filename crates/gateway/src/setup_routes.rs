//! Registry setup: channel listing, full guild provisioning and manual
//! single-webhook setup.

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use {
    herald_webhooks::ChannelKey,
    serde::{Deserialize, Serialize},
};

use crate::{error::ApiError, server::AppState};

#[derive(Debug, Serialize)]
pub struct ChannelOption {
    pub value: ChannelKey,
    pub label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsResponse {
    pub channels: Vec<ChannelOption>,
    pub server_name: Option<String>,
    pub server_logo: Option<String>,
}

pub async fn channels_handler(State(state): State<AppState>) -> Json<ChannelsResponse> {
    let registry = state.gateway.webhooks.registry();
    let workspace = registry.workspace();
    Json(ChannelsResponse {
        channels: registry
            .list()
            .into_iter()
            .map(|(value, label)| ChannelOption { value, label })
            .collect(),
        server_name: workspace.name,
        server_logo: workspace.icon,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetupRequest {
    pub server_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupResponse {
    pub success: bool,
    pub count: usize,
    /// Declarative TOML listing of the new mapping.
    pub code: String,
    pub channels: Vec<ChannelKey>,
    pub server_name: Option<String>,
    pub server_logo: Option<String>,
    /// The state file was written.
    pub auto_updated: bool,
}

pub async fn setup_webhooks_handler(
    State(state): State<AppState>,
    body: Result<Json<SetupRequest>, JsonRejection>,
) -> Result<Json<SetupResponse>, ApiError> {
    let Json(request) = body?;
    let Some(server_id) = request
        .server_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return Err(ApiError::bad_request("Server ID is required"));
    };

    let report = state.gateway.webhooks.provision_workspace(server_id).await?;
    Ok(Json(SetupResponse {
        success: true,
        count: report.count,
        code: report.listing,
        channels: report.channels,
        server_name: report.workspace.name,
        server_logo: report.workspace.icon,
        auto_updated: report.persisted,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManualSetupRequest {
    pub invite_link: Option<String>,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualSetupResponse {
    pub success: bool,
    pub server_name: Option<String>,
    pub server_logo: Option<String>,
    pub channel_name: String,
}

pub async fn setup_manual_webhook_handler(
    State(state): State<AppState>,
    body: Result<Json<ManualSetupRequest>, JsonRejection>,
) -> Result<Json<ManualSetupResponse>, ApiError> {
    let Json(request) = body?;
    let non_blank = |v: &Option<String>| {
        v.as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
    };
    let (Some(invite), Some(webhook_url)) = (
        non_blank(&request.invite_link),
        non_blank(&request.webhook_url),
    ) else {
        return Err(ApiError::bad_request(
            "Invite link and webhook URL are required",
        ));
    };

    let report = state
        .gateway
        .webhooks
        .provision_manual(&invite, &webhook_url)
        .await?;
    Ok(Json(ManualSetupResponse {
        success: true,
        server_name: report.workspace.name,
        server_logo: report.workspace.icon,
        channel_name: report.webhook_name,
    }))
}
