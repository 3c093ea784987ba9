use {
    herald_discord::{EmbedSpec, WebhookPayload},
    serde::Deserialize,
    tracing::{info, warn},
};

use crate::{Error, Result, service::WebhookService};

/// One message to post: target key, embed and optional sender override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeliveryRequest {
    pub channel: String,
    #[serde(flatten)]
    pub embed: EmbedSpec,
    /// Sender display name override.
    pub server_name: Option<String>,
    /// Sender avatar override.
    pub server_logo: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl WebhookService {
    /// Post `request.embed` through the webhook registered for
    /// `request.channel`.
    ///
    /// An empty embed is rejected before the channel is looked up.
    pub async fn deliver(&self, request: &DeliveryRequest) -> Result<()> {
        if !request.embed.has_content() {
            return Err(Error::EmptyEmbed);
        }
        let key = request.channel.trim();
        let endpoint = self.registry.lookup(key).ok_or_else(|| Error::UnknownChannel {
            key: key.to_string(),
        })?;

        let workspace = self.registry.workspace();
        let username = non_blank(request.server_name.as_deref())
            .or(non_blank(workspace.name.as_deref()))
            .unwrap_or(&self.settings.default_sender_name)
            .to_string();
        let avatar = non_blank(request.server_logo.as_deref())
            .or(non_blank(workspace.icon.as_deref()))
            .map(String::from);

        let payload = WebhookPayload::new(username, avatar, request.embed.to_embed());
        self.api
            .execute_webhook(endpoint.url(), &payload)
            .await
            .map_err(|e| {
                warn!(channel = key, endpoint = %endpoint, error = %e, "delivery failed");
                Error::DeliveryFailed {
                    status: e.status(),
                    message: e
                        .remote_message()
                        .unwrap_or("Failed to send message")
                        .to_string(),
                }
            })?;

        info!(channel = key, "message delivered");
        Ok(())
    }
}
