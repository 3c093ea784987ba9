use std::sync::Arc;

use {
    anyhow::Result,
    clap::Subcommand,
    herald_config::HeraldConfig,
    herald_discord::DiscordClient,
    herald_webhooks::{
        RegistrySnapshot, RegistryStore, ServiceSettings, WebhookRegistry, WebhookService,
    },
};

#[derive(Subcommand)]
pub enum WebhooksAction {
    /// Show the persisted channel mapping. Tokens are masked.
    List,
    /// Provision a webhook in every text channel of a server.
    Setup {
        /// Discord server (guild) id.
        #[arg(long)]
        server_id: String,
        /// Print the full listing, tokens included.
        #[arg(long, default_value_t = false)]
        show_tokens: bool,
    },
    /// Register one existing webhook for the server behind an invite.
    Add {
        /// Invite link or bare invite code.
        #[arg(long)]
        invite: String,
        /// Webhook URL copied from the channel settings.
        #[arg(long)]
        url: String,
    },
    /// Delete the persisted mapping.
    Clear,
}

pub async fn handle_webhooks(action: WebhooksAction, config: &HeraldConfig) -> Result<()> {
    let store = RegistryStore::new(config.webhooks.state_path());
    match action {
        WebhooksAction::List => {
            list(&store);
            Ok(())
        },
        WebhooksAction::Setup {
            server_id,
            show_tokens,
        } => setup(config, store, &server_id, show_tokens).await,
        WebhooksAction::Add { invite, url } => add(config, store, &invite, &url).await,
        WebhooksAction::Clear => {
            if store.clear()? {
                println!("Removed {}", store.path().display());
            } else {
                println!("No webhook state at {}", store.path().display());
            }
            Ok(())
        },
    }
}

fn list(store: &RegistryStore) {
    let Some(snapshot) = store.load() else {
        println!("No webhooks configured ({}).", store.path().display());
        return;
    };
    print!("{}", render_listing(&snapshot));
}

fn render_listing(snapshot: &RegistrySnapshot) -> String {
    let mut out = format!(
        "Server: {}\n",
        snapshot.server_name.as_deref().unwrap_or("(unknown)")
    );
    if snapshot.webhooks.is_empty() {
        out.push_str("  (no channels)\n");
    }
    for (key, endpoint) in &snapshot.webhooks {
        out.push_str(&format!("  {:<24} {endpoint}\n", key.display_label()));
    }
    out
}

/// The CLI always writes through to the state file, whatever `persist` says.
fn service(config: &HeraldConfig, store: RegistryStore) -> WebhookService {
    let api = Arc::new(DiscordClient::new(
        config.discord.api_base.clone(),
        config.discord.bot_token.clone(),
    ));
    let registry = store
        .load()
        .map(WebhookRegistry::from_snapshot)
        .unwrap_or_default();
    WebhookService::new(
        api,
        Arc::new(registry),
        ServiceSettings::from_config(&config.discord, &config.webhooks),
    )
    .with_store(store)
}

async fn setup(
    config: &HeraldConfig,
    store: RegistryStore,
    server_id: &str,
    show_tokens: bool,
) -> Result<()> {
    let service = service(config, store);
    let report = service.provision_workspace(server_id).await?;

    println!(
        "Configured {} channel(s) for {} ({} skipped).",
        report.count,
        report.workspace.name.as_deref().unwrap_or(server_id),
        report.skipped
    );
    if show_tokens {
        print!("{}", report.listing);
    } else {
        print!("{}", render_listing(&report.snapshot));
    }
    if !report.persisted {
        eprintln!("warning: webhook state could not be saved");
    }
    Ok(())
}

async fn add(config: &HeraldConfig, store: RegistryStore, invite: &str, url: &str) -> Result<()> {
    let service = service(config, store);
    let report = service.provision_manual(invite, url).await?;
    println!(
        "Added {} ({}) for {}.",
        report.key.display_label(),
        report.webhook_name,
        report.workspace.name.as_deref().unwrap_or("(unknown)")
    );
    if !report.persisted {
        eprintln!("warning: webhook state could not be saved");
    }
    Ok(())
}
