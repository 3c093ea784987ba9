use {
    async_trait::async_trait,
    reqwest::{RequestBuilder, Response},
    secrecy::{ExposeSecret, Secret},
    serde::de::DeserializeOwned,
    tracing::{debug, warn},
};

use crate::{
    Error, Result,
    api::DiscordApi,
    embed::WebhookPayload,
    types::{Channel, Guild, Invite, Webhook},
};

/// reqwest-backed [`DiscordApi`] implementation.
pub struct DiscordClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: Option<Secret<String>>,
}

impl DiscordClient {
    pub fn new(api_base: impl Into<String>, bot_token: Option<Secret<String>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    pub fn has_bot_token(&self) -> bool {
        self.bot_token.is_some()
    }

    fn bot_get(&self, path: &str) -> Result<RequestBuilder> {
        let token = self.bot_token.as_ref().ok_or(Error::MissingBotToken)?;
        Ok(self
            .http
            .get(format!("{}{path}", self.api_base))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bot {}", token.expose_secret()),
            ))
    }

    fn bot_post(&self, path: &str) -> Result<RequestBuilder> {
        let token = self.bot_token.as_ref().ok_or(Error::MissingBotToken)?;
        Ok(self
            .http
            .post(format!("{}{path}", self.api_base))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bot {}", token.expose_secret()),
            ))
    }
}

/// Send a request and decode a JSON body, mapping non-success statuses to
/// [`Error::Api`].
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
    let resp = check_status(req.send().await?).await?;
    Ok(resp.json::<T>().await?)
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        message: remote_message(&body),
    })
}

/// Discord error bodies look like `{"message": "...", "code": 10003}`.
fn remote_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|m| !m.trim().is_empty())
        .map(ToString::to_string)
}

#[async_trait]
impl DiscordApi for DiscordClient {
    async fn guild(&self, guild_id: &str) -> Result<Guild> {
        debug!(guild_id, "fetching guild");
        fetch_json(self.bot_get(&format!("/guilds/{guild_id}"))?).await
    }

    async fn guild_channels(&self, guild_id: &str) -> Result<Vec<Channel>> {
        debug!(guild_id, "fetching guild channels");
        fetch_json(self.bot_get(&format!("/guilds/{guild_id}/channels"))?).await
    }

    async fn channel_webhooks(&self, channel_id: &str) -> Result<Vec<Webhook>> {
        fetch_json(self.bot_get(&format!("/channels/{channel_id}/webhooks"))?).await
    }

    async fn create_webhook(&self, channel_id: &str, name: &str) -> Result<Webhook> {
        debug!(channel_id, name, "creating webhook");
        let req = self
            .bot_post(&format!("/channels/{channel_id}/webhooks"))?
            .json(&serde_json::json!({ "name": name }));
        fetch_json(req).await
    }

    async fn invite(&self, code: &str) -> Result<Invite> {
        let req = self
            .http
            .get(format!("{}/invites/{code}", self.api_base))
            .query(&[("with_counts", "false")]);
        fetch_json(req).await
    }

    async fn webhook_info(&self, webhook_url: &str) -> Result<Webhook> {
        fetch_json(self.http.get(webhook_url)).await
    }

    async fn execute_webhook(&self, webhook_url: &str, payload: &WebhookPayload) -> Result<()> {
        let resp = self.http.post(webhook_url).json(payload).send().await?;
        if let Err(e) = check_status(resp).await {
            warn!(status = ?e.status(), error = %e, "webhook execution rejected");
            return Err(e);
        }
        Ok(())
    }
}
