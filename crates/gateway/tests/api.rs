//! End-to-end tests for the HTTP surface, with Discord and the LLM faked.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use {
    async_trait::async_trait,
    herald_agents::{ChatMessage, LlmProvider},
    herald_config::HeraldConfig,
    herald_discord::{
        Channel, DiscordApi, Error as DiscordError, Guild, Invite, Result as DiscordResult, Webhook,
        WebhookPayload,
    },
    herald_gateway::{GatewayState, auth::UserProfile, build_gateway_app},
    herald_webhooks::{RegistryStore, ServiceSettings, WebhookRegistry, WebhookService},
    secrecy::Secret,
    serde_json::{Value, json},
    tokio::net::TcpListener,
};

const WEBHOOK_BASE: &str = "https://discord.com/api/webhooks";

#[derive(Default)]
struct FakeDiscord {
    sent: Mutex<Vec<WebhookPayload>>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl DiscordApi for FakeDiscord {
    async fn guild(&self, guild_id: &str) -> DiscordResult<Guild> {
        self.calls.lock().unwrap().push(format!("guild {guild_id}"));
        if guild_id != "g1" {
            return Err(DiscordError::Api {
                status: 404,
                message: Some("Unknown Guild".into()),
            });
        }
        Ok(Guild {
            id: "g1".into(),
            name: "Herald HQ".into(),
            icon: None,
        })
    }

    async fn guild_channels(&self, _guild_id: &str) -> DiscordResult<Vec<Channel>> {
        Ok(vec![
            Channel {
                id: "1".into(),
                name: Some("general".into()),
                kind: 0,
            },
            Channel {
                id: "2".into(),
                name: Some("Bot Commands".into()),
                kind: 0,
            },
            Channel {
                id: "3".into(),
                name: Some("Voice".into()),
                kind: 2,
            },
        ])
    }

    async fn channel_webhooks(&self, _channel_id: &str) -> DiscordResult<Vec<Webhook>> {
        Ok(Vec::new())
    }

    async fn create_webhook(&self, channel_id: &str, name: &str) -> DiscordResult<Webhook> {
        Ok(Webhook {
            id: format!("w{channel_id}"),
            name: Some(name.into()),
            token: Some(format!("t{channel_id}")),
            channel_id: Some(channel_id.into()),
            guild_id: Some("g1".into()),
        })
    }

    async fn invite(&self, code: &str) -> DiscordResult<Invite> {
        self.calls.lock().unwrap().push(format!("invite {code}"));
        Err(DiscordError::Api {
            status: 404,
            message: Some("Unknown Invite".into()),
        })
    }

    async fn webhook_info(&self, _webhook_url: &str) -> DiscordResult<Webhook> {
        Err(DiscordError::Api {
            status: 404,
            message: Some("Unknown Webhook".into()),
        })
    }

    async fn execute_webhook(&self, _url: &str, payload: &WebhookPayload) -> DiscordResult<()> {
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

struct FakeLlm(&'static str);

#[async_trait]
impl LlmProvider for FakeLlm {
    fn name(&self) -> &str {
        "fake"
    }

    fn id(&self) -> &str {
        "fake-1"
    }

    async fn complete(&self, _messages: &[ChatMessage]) -> herald_agents::Result<String> {
        Ok(self.0.to_string())
    }
}

struct TestServer {
    addr: SocketAddr,
    state: Arc<GatewayState>,
    discord: Arc<FakeDiscord>,
    http: reqwest::Client,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Cookie header for a freshly signed-in operator.
    fn login(&self) -> String {
        let token = self.state.sessions.create_session(UserProfile {
            id: "7".into(),
            username: "ops".into(),
            discriminator: None,
            avatar: "https://cdn.discordapp.com/embed/avatars/0.png".into(),
            email: None,
        });
        format!("herald_session={token}")
    }

    async fn post(&self, path: &str, cookie: &str, body: Value) -> (u16, Value) {
        let resp = self
            .http
            .post(self.url(path))
            .header("cookie", cookie)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn get(&self, path: &str, cookie: &str) -> (u16, Value) {
        let resp = self
            .http
            .get(self.url(path))
            .header("cookie", cookie)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }
}

async fn start(
    config: HeraldConfig,
    llm: Option<Arc<dyn LlmProvider>>,
    store: Option<RegistryStore>,
) -> TestServer {
    let discord = Arc::new(FakeDiscord::default());
    let mut webhooks = WebhookService::new(
        discord.clone(),
        Arc::new(WebhookRegistry::new()),
        ServiceSettings::from_config(&config.discord, &config.webhooks),
    );
    if let Some(store) = store {
        webhooks = webhooks.with_store(store);
    }
    let state = GatewayState::new(config, webhooks, llm);
    let app = build_gateway_app(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    TestServer {
        addr,
        state,
        discord,
        http,
    }
}

async fn start_default() -> TestServer {
    start(HeraldConfig::default(), None, None).await
}

#[tokio::test]
async fn public_routes_need_no_session() {
    let mut config = HeraldConfig::default();
    config.discord.client_id = Some("cid-1".into());
    let srv = start(config, None, None).await;

    let (status, body) = srv.get("/health", "").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["channels"], 0);

    let (status, body) = srv.get("/client-id", "").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "clientId": "cid-1" }));

    let (status, body) = srv.get("/auth/user", "").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "user": null }));
}

#[tokio::test]
async fn protected_routes_reject_missing_session() {
    let srv = start_default().await;
    for path in ["/send-message", "/ai-improve", "/setup-webhooks", "/setup-manual-webhook"] {
        let (status, body) = srv.post(path, "", json!({})).await;
        assert_eq!(status, 401, "{path}");
        assert_eq!(body, json!({ "error": "Authentication required" }));
    }
    let (status, _) = srv.get("/channels", "herald_session=forged").await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn provision_list_and_send() {
    let srv = start_default().await;
    let cookie = srv.login();

    let (status, body) = srv.post("/setup-webhooks", &cookie, json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Server ID is required");

    let (status, body) = srv
        .post("/setup-webhooks", &cookie, json!({ "serverId": "g1" }))
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["channels"], json!(["bot_commands", "general"]));
    assert_eq!(body["serverName"], "Herald HQ");
    assert_eq!(
        body["serverLogo"],
        "https://cdn.discordapp.com/embed/avatars/0.png"
    );
    assert_eq!(body["autoUpdated"], false);
    assert!(
        body["code"]
            .as_str()
            .unwrap()
            .contains(&format!("general = \"{WEBHOOK_BASE}/w1/t1\""))
    );

    let (status, body) = srv.get("/channels", &cookie).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "channels": [
                { "value": "bot_commands", "label": "Bot Commands" },
                { "value": "general", "label": "General" }
            ],
            "serverName": "Herald HQ",
            "serverLogo": "https://cdn.discordapp.com/embed/avatars/0.png"
        })
    );

    let (status, body) = srv
        .post(
            "/send-message",
            &cookie,
            json!({ "channel": "general", "title": "Deploy", "color": "green", "fieldValue": "1.2.3" }),
        )
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body, json!({ "success": true, "message": "Message sent successfully" }));

    let sent = srv.discord.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].username, "Herald HQ");
    assert_eq!(sent[0].embeds[0].color, 0x57F287);
    assert_eq!(sent[0].embeds[0].fields[0].name, "\u{200b}");
}

#[tokio::test]
async fn send_message_validation() {
    let srv = start_default().await;
    let cookie = srv.login();

    let (status, body) = srv.post("/send-message", &cookie, json!({ "title": "x" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Channel is required");

    let (status, body) = srv
        .post("/send-message", &cookie, json!({ "channel": "nowhere", "color": "red" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "At least one embed field is required");

    let (status, body) = srv
        .post("/send-message", &cookie, json!({ "channel": "nowhere", "title": "x" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid channel selected");
    assert!(srv.discord.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn setup_failures_map_to_json_errors() {
    let srv = start_default().await;
    let cookie = srv.login();

    let (status, body) = srv
        .post("/setup-webhooks", &cookie, json!({ "serverId": "unknown" }))
        .await;
    assert_eq!(status, 502);
    assert!(body["error"].as_str().unwrap().contains("Unknown Guild"));

    let (status, body) = srv
        .post("/setup-manual-webhook", &cookie, json!({ "inviteLink": "abc" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invite link and webhook URL are required");

    let (status, body) = srv
        .post(
            "/setup-manual-webhook",
            &cookie,
            json!({ "inviteLink": "abc", "webhookUrl": "https://example.com/hook" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid webhook URL format");
    assert!(
        !srv.discord
            .calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.starts_with("invite"))
    );

    let (status, body) = srv
        .post(
            "/setup-manual-webhook",
            &cookie,
            json!({ "inviteLink": "https://discord.gg/gone", "webhookUrl": format!("{WEBHOOK_BASE}/1/t") }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid invite link or invite has expired");
}

#[tokio::test]
async fn setup_persists_when_store_configured() {
    let dir = tempfile::tempdir().unwrap();
    let store = RegistryStore::new(dir.path().join("webhooks.json"));
    let srv = start(HeraldConfig::default(), None, Some(store.clone())).await;
    let cookie = srv.login();

    let (status, body) = srv
        .post("/setup-webhooks", &cookie, json!({ "serverId": "g1" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["autoUpdated"], true);
    assert_eq!(store.load().unwrap().webhooks.len(), 2);
}

#[tokio::test]
async fn ai_improve_round_trip() {
    let llm: Arc<dyn LlmProvider> = Arc::new(FakeLlm(
        "```json\n{\"title\": \"Release Notes\", \"description\": \"Fixed bugs.\"}\n```",
    ));
    let srv = start(HeraldConfig::default(), Some(llm), None).await;
    let cookie = srv.login();

    let (status, body) = srv
        .post("/ai-improve", &cookie, json!({ "title": "relase notes" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "title": "Release Notes" }));

    let (status, body) = srv.post("/ai-improve", &cookie, json!({ "title": "" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No text provided to improve");
}

#[tokio::test]
async fn ai_improve_reports_unparsable_reply_and_missing_provider() {
    let llm: Arc<dyn LlmProvider> = Arc::new(FakeLlm("I improved it for you!"));
    let srv = start(HeraldConfig::default(), Some(llm), None).await;
    let cookie = srv.login();
    let (status, body) = srv.post("/ai-improve", &cookie, json!({ "title": "x" })).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to parse AI response");

    let srv = start_default().await;
    let cookie = srv.login();
    let (status, _) = srv.post("/ai-improve", &cookie, json!({ "title": "x" })).await;
    assert_eq!(status, 500);
}

fn oauth_config(server: &mockito::Server) -> HeraldConfig {
    let mut config = HeraldConfig::default();
    config.discord.client_id = Some("cid-1".into());
    config.discord.client_secret = Some(Secret::new("shh".into()));
    config.discord.authorize_url = format!("{}/oauth2/authorize", server.url());
    config.discord.token_url = format!("{}/oauth2/token", server.url());
    config.discord.api_base = server.url();
    config
}

#[tokio::test]
async fn oauth_sign_in_and_logout() {
    let mut upstream = mockito::Server::new_async().await;
    let _token = upstream
        .mock("POST", "/oauth2/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"at-1","token_type":"Bearer","expires_in":604800}"#)
        .create_async()
        .await;
    let _me = upstream
        .mock("GET", "/users/@me")
        .match_header("authorization", "Bearer at-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"77","username":"ops","discriminator":"0","avatar":"abc","email":"ops@example.com"}"#)
        .create_async()
        .await;
    let srv = start(oauth_config(&upstream), None, None).await;

    let resp = srv.http.get(srv.url("/auth/discord")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 303);
    let location = url::Url::parse(resp.headers()["location"].to_str().unwrap()).unwrap();
    let params: std::collections::HashMap<_, _> = location.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], "cid-1");
    assert_eq!(
        params["redirect_uri"],
        format!("http://{}/auth/discord/callback", srv.addr)
    );
    let state = params["state"].clone();

    let resp = srv
        .http
        .get(srv.url(&format!("/auth/discord/callback?code=c-1&state={state}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(resp.headers()["location"], "/");
    let set_cookie = resp.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly; SameSite=Lax; Path=/; Max-Age=86400"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let (status, body) = srv.get("/auth/user", &cookie).await;
    assert_eq!(status, 200);
    assert_eq!(body["user"]["id"], "77");
    assert_eq!(
        body["user"]["avatar"],
        format!("{}/avatars/77/abc.png", srv.state.config.discord.cdn_base)
    );

    let (status, body) = srv.post("/auth/logout", &cookie, json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "success": true }));
    let (_, body) = srv.get("/auth/user", &cookie).await;
    assert_eq!(body, json!({ "user": null }));
}

#[tokio::test]
async fn oauth_callback_failures_redirect_with_error() {
    let mut upstream = mockito::Server::new_async().await;
    let _token = upstream
        .mock("POST", "/oauth2/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;
    let srv = start(oauth_config(&upstream), None, None).await;

    let resp = srv.http.get(srv.url("/auth/discord/callback")).send().await.unwrap();
    assert_eq!(resp.headers()["location"], "/?error=no_code");

    let resp = srv
        .http
        .get(srv.url("/auth/discord/callback?code=c-1&state=forged"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["location"], "/?error=auth_failed");

    let state = srv.state.sessions.issue_state();
    let resp = srv
        .http
        .get(srv.url(&format!("/auth/discord/callback?code=c-1&state={state}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["location"], "/?error=auth_failed");
    assert!(resp.headers().get("set-cookie").is_none());
}

#[tokio::test]
async fn login_without_client_id_is_an_error() {
    let srv = start_default().await;
    let (status, body) = srv.get("/auth/discord", "").await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Discord OAuth is not configured");
}
