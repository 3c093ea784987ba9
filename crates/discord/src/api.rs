use async_trait::async_trait;

use crate::{
    Result,
    embed::WebhookPayload,
    types::{Channel, Guild, Invite, Webhook},
};

/// The slice of the Discord REST API herald depends on.
///
/// Methods taking a guild or channel id need the bot credential; the invite
/// and webhook-URL methods are public and carry no credential.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    async fn guild(&self, guild_id: &str) -> Result<Guild>;

    async fn guild_channels(&self, guild_id: &str) -> Result<Vec<Channel>>;

    async fn channel_webhooks(&self, channel_id: &str) -> Result<Vec<Webhook>>;

    async fn create_webhook(&self, channel_id: &str, name: &str) -> Result<Webhook>;

    /// Public invite metadata (`with_counts=false`).
    async fn invite(&self, code: &str) -> Result<Invite>;

    /// Webhook metadata fetched through the token-bearing URL itself.
    async fn webhook_info(&self, webhook_url: &str) -> Result<Webhook>;

    async fn execute_webhook(&self, webhook_url: &str, payload: &WebhookPayload) -> Result<()>;
}
