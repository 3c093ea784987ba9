/// Config schema types (server, discord, llm, session, webhooks).
use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    pub server: ServerConfig,
    pub discord: DiscordConfig,
    pub llm: LlmConfig,
    pub session: SessionConfig,
    pub webhooks: WebhooksConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0".
    pub bind: String,
    /// Port to listen on. Defaults to 5000.
    pub port: u16,
    /// Add the `Secure` attribute to session cookies.
    pub secure_cookies: bool,
    /// Public base URL (e.g. `https://herald.example.com`). When set, the
    /// OAuth redirect URI is built from it instead of the request `Host`.
    pub public_url: Option<String>,
    /// Hosts ending in one of these suffixes sit behind a TLS-terminating
    /// proxy, so redirect URIs for them always use `https`.
    pub https_host_suffixes: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5000,
            secure_cookies: false,
            public_url: None,
            https_host_suffixes: vec!["replit.dev".into()],
        }
    }
}

/// Discord application, bot and REST endpoints.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// OAuth2 application client id.
    pub client_id: Option<String>,
    /// OAuth2 application client secret.
    #[serde(serialize_with = "serialize_option_secret")]
    pub client_secret: Option<Secret<String>>,
    /// Bot token used for guild, channel and webhook administration.
    #[serde(serialize_with = "serialize_option_secret")]
    pub bot_token: Option<Secret<String>>,
    /// REST API base, without trailing slash.
    pub api_base: String,
    /// Base of webhook URLs; pasted webhook URLs must start with `{webhook_base}/`.
    pub webhook_base: String,
    /// CDN base used for guild icons and avatars.
    pub cdn_base: String,
    pub authorize_url: String,
    pub token_url: String,
    pub scopes: Vec<String>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            bot_token: None,
            api_base: "https://discord.com/api/v10".into(),
            webhook_base: "https://discord.com/api/webhooks".into(),
            cdn_base: "https://cdn.discordapp.com".into(),
            authorize_url: "https://discord.com/api/oauth2/authorize".into(),
            token_url: "https://discord.com/api/oauth2/token".into(),
            scopes: vec!["identify".into(), "email".into()],
        }
    }
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("webhook_base", &self.webhook_base)
            .field("cdn_base", &self.cdn_base)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// OpenAI-compatible chat completion provider used for text polishing.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(serialize_with = "serialize_option_secret")]
    pub api_key: Option<Secret<String>>,
    /// Base URL including the API version segment, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session lifetime in seconds. Defaults to 24 hours.
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 24 * 60 * 60,
        }
    }
}

/// Webhook registry persistence and provisioning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhooksConfig {
    /// Write the registry to the state file after every change.
    pub persist: bool,
    /// State file path. Defaults to `<data_dir>/webhooks.json`.
    pub state_file: Option<PathBuf>,
    /// Maximum number of channels provisioned at once.
    pub provision_concurrency: usize,
    /// Sender name used when neither the request nor the registry has one.
    pub default_sender_name: String,
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            persist: true,
            state_file: None,
            provision_concurrency: 4,
            default_sender_name: "Message Sender".into(),
        }
    }
}

impl WebhooksConfig {
    /// Resolved state file path.
    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| crate::loader::data_dir().join("webhooks.json"))
    }
}

/// Serialize an `Option<Secret<String>>` by exposing its inner value.
/// Only used when writing config back to disk.
fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
