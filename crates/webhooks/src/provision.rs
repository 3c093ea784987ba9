//! Filling the registry: full guild scan and single pasted webhook.

use std::{collections::BTreeMap, sync::Arc};

use {
    futures::{StreamExt, stream},
    herald_discord::{Channel, Webhook, cdn::guild_icon_url},
    serde::Serialize,
    tracing::{debug, info, warn},
};

use crate::{
    Error, Result,
    channel_key::ChannelKey,
    endpoint::EndpointRef,
    invite::normalize_invite,
    registry::{RegistrySnapshot, Workspace},
    service::WebhookService,
};

/// Outcome of a full guild scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionReport {
    /// Distinct keys committed.
    pub count: usize,
    pub channels: Vec<ChannelKey>,
    pub workspace: Workspace,
    /// TOML listing of the committed mapping, tokens included.
    pub listing: String,
    /// Text channels that failed and were left out.
    pub skipped: usize,
    pub persisted: bool,
    /// The committed mapping itself.
    #[serde(skip)]
    pub snapshot: Arc<RegistrySnapshot>,
}

/// Outcome of adding one pasted webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualReport {
    pub workspace: Workspace,
    pub key: ChannelKey,
    /// Webhook display name as reported upstream (`webhook` when unnamed).
    pub webhook_name: String,
    pub persisted: bool,
}

impl WebhookService {
    /// Create or reuse a webhook in every text channel of `guild_id` and
    /// replace the registry with the result.
    ///
    /// Individual channel failures are logged and skipped. The registry is
    /// only replaced when at least one channel succeeded.
    pub async fn provision_workspace(&self, guild_id: &str) -> Result<ProvisionReport> {
        let guild = self
            .api
            .guild(guild_id)
            .await
            .map_err(Error::workspace_lookup)?;
        let channels = self
            .api
            .guild_channels(guild_id)
            .await
            .map_err(Error::workspace_lookup)?;

        let workspace = Workspace::new(
            guild.name.clone(),
            guild_icon_url(&self.settings.cdn_base, &guild.id, guild.icon.as_deref()),
        );
        let text: Vec<Channel> = channels.into_iter().filter(Channel::is_text).collect();
        let attempted = text.len();
        info!(guild_id, channels = attempted, "provisioning webhooks");

        let results: Vec<(Channel, herald_discord::Result<Webhook>)> = stream::iter(text)
            .map(|channel| {
                let name = guild.name.as_str();
                async move {
                    let result = self.ensure_webhook(&channel.id, name).await;
                    (channel, result)
                }
            })
            .buffer_unordered(self.settings.provision_concurrency.max(1))
            .collect()
            .await;

        let mut entries = BTreeMap::new();
        let mut skipped = 0;
        for (channel, result) in results {
            let label = channel.name.as_deref().unwrap_or(&channel.id);
            let webhook = match result {
                Ok(w) => w,
                Err(e) => {
                    warn!(channel = label, error = %e, "skipping channel");
                    skipped += 1;
                    continue;
                },
            };
            let Some(token) = webhook.token.as_deref() else {
                warn!(channel = label, webhook_id = %webhook.id, "webhook has no token, skipping channel");
                skipped += 1;
                continue;
            };

            let key = ChannelKey::normalize_or(label, &channel.id);
            let endpoint = EndpointRef::from_parts(&self.settings.webhook_base, &webhook.id, token);
            if entries.insert(key.clone(), endpoint).is_some() {
                warn!(channel = label, key = %key, "channel key collision, keeping the later channel");
            }
        }

        if entries.is_empty() {
            return Err(Error::NoChannelsProvisioned { attempted });
        }

        let channels: Vec<ChannelKey> = entries.keys().cloned().collect();
        let snapshot = self.registry.replace_all(entries, workspace.clone());
        let listing = snapshot.to_toml()?;
        let persisted = self.persist(&snapshot);
        info!(guild_id, count = channels.len(), skipped, "webhooks provisioned");

        Ok(ProvisionReport {
            count: channels.len(),
            channels,
            workspace,
            listing,
            skipped,
            persisted,
            snapshot,
        })
    }

    /// Reuse the channel's webhook named `name` or create one.
    async fn ensure_webhook(&self, channel_id: &str, name: &str) -> herald_discord::Result<Webhook> {
        let existing = self.api.channel_webhooks(channel_id).await?;
        if let Some(webhook) = existing
            .into_iter()
            .find(|w| w.name.as_deref() == Some(name) && w.token.is_some())
        {
            debug!(channel_id, webhook_id = %webhook.id, "reusing existing webhook");
            return Ok(webhook);
        }
        debug!(channel_id, "creating webhook");
        self.api.create_webhook(channel_id, name).await
    }

    /// Register one operator-supplied webhook without touching other keys.
    ///
    /// The URL prefix is checked before any network call. The key comes from
    /// the webhook's own display name.
    pub async fn provision_manual(&self, invite: &str, webhook_url: &str) -> Result<ManualReport> {
        let endpoint = EndpointRef::parse(webhook_url, &self.settings.webhook_base)?;
        let code = normalize_invite(invite)?;

        let invite = self.api.invite(&code).await.map_err(|e| {
            warn!(invite = %code, error = %e, "invite lookup failed");
            Error::InviteResolution { status: e.status() }
        })?;
        let guild = invite
            .guild
            .ok_or(Error::InviteResolution { status: None })?;

        let webhook = self.api.webhook_info(endpoint.url()).await.map_err(|e| {
            warn!(endpoint = %endpoint, error = %e, "webhook lookup failed");
            Error::EndpointUnreachable { status: e.status() }
        })?;

        let webhook_name = webhook
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "webhook".into());
        let key = ChannelKey::normalize_or(&webhook_name, "webhook");
        let workspace = Workspace::new(
            guild.name.clone(),
            guild_icon_url(&self.settings.cdn_base, &guild.id, guild.icon.as_deref()),
        );

        let snapshot = self.registry.upsert(key.clone(), endpoint, workspace.clone());
        let persisted = self.persist(&snapshot);
        info!(
            key = %key,
            guild = %guild.name,
            channel_id = webhook.channel_id.as_deref().unwrap_or_default(),
            "manual webhook added"
        );

        Ok(ManualReport {
            workspace,
            key,
            webhook_name,
            persisted,
        })
    }
}
