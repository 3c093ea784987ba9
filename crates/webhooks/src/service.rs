use std::sync::Arc;

use {
    herald_config::{DiscordConfig, WebhooksConfig},
    herald_discord::DiscordApi,
    tracing::warn,
};

use crate::{
    registry::{RegistrySnapshot, WebhookRegistry},
    store::RegistryStore,
};

/// Knobs for provisioning and delivery, usually taken from config.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Webhook URLs must start with `{webhook_base}/`.
    pub webhook_base: String,
    pub cdn_base: String,
    pub provision_concurrency: usize,
    pub default_sender_name: String,
}

impl ServiceSettings {
    pub fn from_config(discord: &DiscordConfig, webhooks: &WebhooksConfig) -> Self {
        Self {
            webhook_base: discord.webhook_base.trim_end_matches('/').to_string(),
            cdn_base: discord.cdn_base.trim_end_matches('/').to_string(),
            provision_concurrency: webhooks.provision_concurrency.max(1),
            default_sender_name: webhooks.default_sender_name.clone(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from_config(&DiscordConfig::default(), &WebhooksConfig::default())
    }
}

/// Owns the registry and everything that writes to it.
pub struct WebhookService {
    pub(crate) api: Arc<dyn DiscordApi>,
    pub(crate) registry: Arc<WebhookRegistry>,
    pub(crate) store: Option<RegistryStore>,
    pub(crate) settings: ServiceSettings,
}

impl WebhookService {
    pub fn new(
        api: Arc<dyn DiscordApi>,
        registry: Arc<WebhookRegistry>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            api,
            registry,
            store: None,
            settings,
        }
    }

    /// Persist every committed snapshot to `store`.
    #[must_use]
    pub fn with_store(mut self, store: RegistryStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn registry(&self) -> &Arc<WebhookRegistry> {
        &self.registry
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Write the current snapshot. Failures are logged, never returned.
    pub(crate) fn persist(&self, snapshot: &RegistrySnapshot) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        match store.save(snapshot) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %store.path().display(), error = %e, "failed to persist webhook registry");
                false
            },
        }
    }
}
