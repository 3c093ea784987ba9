use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use tracing::warn;

/// A failed request: status plus one human-readable message, rendered as
/// `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

fn credential_rejected(status: Option<u16>) -> bool {
    matches!(status, Some(401 | 403))
}

impl From<herald_webhooks::Error> for ApiError {
    fn from(err: herald_webhooks::Error) -> Self {
        use herald_webhooks::Error as E;

        warn!(error = %err, "webhook operation failed");
        match err {
            E::WorkspaceLookup { status, .. } if credential_rejected(status) => Self::internal(
                "Failed to fetch server info. Make sure the bot is in the server.",
            ),
            E::WorkspaceLookup { message, .. } => {
                Self::bad_gateway(format!("Failed to fetch server info: {message}"))
            },
            E::InviteResolution { .. } => {
                Self::bad_request("Invalid invite link or invite has expired")
            },
            E::EndpointUnreachable { .. } => {
                Self::bad_request("Invalid webhook URL. The webhook may have been deleted.")
            },
            E::InvalidEndpointFormat => Self::bad_request("Invalid webhook URL format"),
            E::InvalidInvite { .. } => Self::bad_request("Invalid invite link"),
            E::NoChannelsProvisioned { .. } => Self::bad_gateway(
                "No webhooks could be created. Make sure the bot can manage webhooks in at least one text channel.",
            ),
            E::UnknownChannel { .. } => Self::bad_request("Invalid channel selected"),
            E::EmptyEmbed => Self::bad_request("At least one embed field is required"),
            E::DeliveryFailed { status, .. } if credential_rejected(status) => {
                Self::internal("Failed to send message. Please try again.")
            },
            E::DeliveryFailed { message, .. } => {
                Self::bad_gateway(format!("Failed to send message: {message}"))
            },
            E::MissingBotToken => Self::internal("Discord bot token not configured"),
            E::Store { .. } => Self::internal("Failed to save webhooks"),
        }
    }
}

impl From<herald_agents::Error> for ApiError {
    fn from(err: herald_agents::Error) -> Self {
        use herald_agents::Error as E;

        warn!(error = %err, "text polish failed");
        match err {
            E::NothingToImprove => Self::bad_request("No text provided to improve"),
            E::UnparsableModelResponse { .. } => Self::internal("Failed to parse AI response"),
            E::Provider { status, .. } if credential_rejected(Some(status)) => {
                Self::internal("Failed to improve text")
            },
            E::Provider { .. } | E::EmptyCompletion | E::Http(_) => {
                Self::bad_gateway("Failed to improve text. Please try again.")
            },
        }
    }
}
