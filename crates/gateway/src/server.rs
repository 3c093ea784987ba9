use std::{net::SocketAddr, sync::Arc, time::Duration};

use {
    axum::{
        Router,
        extract::{FromRef, State},
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    herald_config::HeraldConfig,
    herald_discord::DiscordClient,
    herald_webhooks::{RegistryStore, ServiceSettings, WebhookRegistry, WebhookService},
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::{info, warn},
};

use crate::{
    auth_middleware::require_auth, auth_routes::auth_router, message_routes, setup_routes,
    state::GatewayState,
};

/// How often expired sessions and OAuth states are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayState>,
}

impl FromRef<AppState> for Arc<GatewayState> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.gateway)
    }
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app_state = AppState { gateway: state };

    // Routes that require a signed-in operator.
    let protected = Router::new()
        .route("/send-message", post(message_routes::send_message_handler))
        .route("/ai-improve", post(message_routes::ai_improve_handler))
        .route("/channels", get(setup_routes::channels_handler))
        .route("/setup-webhooks", post(setup_routes::setup_webhooks_handler))
        .route(
            "/setup-manual-webhook",
            post(setup_routes::setup_manual_webhook_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/client-id", get(client_id_handler))
        .merge(auth_router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Build every collaborator from `config` and serve until Ctrl-C.
pub async fn start_gateway(config: HeraldConfig) -> anyhow::Result<()> {
    let api = Arc::new(DiscordClient::new(
        config.discord.api_base.clone(),
        config.discord.bot_token.clone(),
    ));

    let store = config
        .webhooks
        .persist
        .then(|| RegistryStore::new(config.webhooks.state_path()));
    let registry = store
        .as_ref()
        .and_then(RegistryStore::load)
        .map(WebhookRegistry::from_snapshot)
        .unwrap_or_default();
    let mut webhooks = WebhookService::new(
        api.clone(),
        Arc::new(registry),
        ServiceSettings::from_config(&config.discord, &config.webhooks),
    );
    if let Some(store) = store.clone() {
        webhooks = webhooks.with_store(store);
    }

    let llm = herald_agents::provider_from_config(&config.llm);
    let bind = config.server.bind.clone();
    let port = config.server.port;
    let state = GatewayState::new(config, webhooks, llm);

    let listener = tokio::net::TcpListener::bind((bind.as_str(), port)).await?;
    let addr = listener.local_addr()?;

    // Startup banner.
    let lines = [
        format!("herald gateway v{}", state.version),
        format!("listening on http://{addr}"),
        format!(
            "channels: {} ({})",
            state.webhooks.registry().len(),
            state
                .webhooks
                .registry()
                .workspace()
                .name
                .as_deref()
                .unwrap_or("no server")
        ),
        format!(
            "discord oauth: {}, bot token: {}",
            if state.oauth.is_some() {
                "configured"
            } else {
                "missing"
            },
            if api.has_bot_token() {
                "configured"
            } else {
                "missing"
            },
        ),
        format!(
            "llm: {}",
            state
                .llm
                .as_ref()
                .map_or_else(|| "disabled".to_string(), |p| format!("{} ({})", p.name(), p.id()))
        ),
        format!(
            "state: {}",
            store.as_ref().map_or_else(
                || "in memory only".to_string(),
                |s| s.path().display().to_string()
            )
        ),
    ];
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));
    if state.oauth.is_none() {
        warn!("DISCORD_CLIENT_ID is not set; sign-in is unavailable");
    }

    let sweep_state = Arc::clone(&state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweep_state.sessions.cleanup_expired();
        }
    });

    let app = build_gateway_app(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.gateway.version,
        "channels": state.gateway.webhooks.registry().len(),
    }))
}

async fn client_id_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "clientId": state.gateway.client_id() }))
}
