use std::{sync::Arc, time::Duration};

use {
    herald_agents::LlmProvider,
    herald_config::HeraldConfig,
    herald_oauth::{OAuthFlow, discord_oauth_config},
    herald_webhooks::WebhookService,
};

use crate::auth::SessionStore;

/// Everything request handlers share.
pub struct GatewayState {
    pub version: String,
    pub config: HeraldConfig,
    pub webhooks: WebhookService,
    /// `None` when no LLM API key is configured.
    pub llm: Option<Arc<dyn LlmProvider>>,
    /// `None` when no OAuth client id is configured.
    pub oauth: Option<OAuthFlow>,
    pub sessions: SessionStore,
}

impl GatewayState {
    pub fn new(
        config: HeraldConfig,
        webhooks: WebhookService,
        llm: Option<Arc<dyn LlmProvider>>,
    ) -> Arc<Self> {
        let oauth = discord_oauth_config(&config.discord).map(OAuthFlow::new);
        let sessions = SessionStore::new(Duration::from_secs(config.session.ttl_secs));
        Arc::new(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            webhooks,
            llm,
            oauth,
            sessions,
        })
    }

    /// Public OAuth client id, empty when unset.
    pub fn client_id(&self) -> &str {
        self.config.discord.client_id.as_deref().unwrap_or_default()
    }
}
