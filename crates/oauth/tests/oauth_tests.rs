#![allow(clippy::unwrap_used, clippy::expect_used)]
use {
    herald_oauth::{OAuthConfig, OAuthFlow, generate_state},
    secrecy::{ExposeSecret, Secret},
};

fn config(base: &str) -> OAuthConfig {
    OAuthConfig {
        client_id: "client-123".into(),
        client_secret: Some(Secret::new("shh".into())),
        auth_url: format!("{base}/oauth2/authorize"),
        token_url: format!("{base}/oauth2/token"),
        userinfo_url: format!("{base}/users/@me"),
        scopes: vec!["identify".into(), "email".into()],
    }
}

#[derive(serde::Deserialize)]
struct Me {
    id: String,
    username: String,
}

#[test]
fn authorization_url_has_code_flow_params() {
    let flow = OAuthFlow::new(config("https://discord.com/api"));
    let state = generate_state();
    let raw = flow
        .authorization_url("http://localhost:5000/auth/discord/callback", &state)
        .unwrap();

    let url = url::Url::parse(&raw).unwrap();
    assert_eq!(url.host_str(), Some("discord.com"));
    assert_eq!(url.path(), "/api/oauth2/authorize");

    let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], "client-123");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["scope"], "identify email");
    assert_eq!(
        params["redirect_uri"],
        "http://localhost:5000/auth/discord/callback"
    );
    assert_eq!(params["state"], state);
    assert!(!raw.contains("shh"));
}

#[test]
fn invalid_auth_url_is_an_error() {
    let mut cfg = config("https://discord.com/api");
    cfg.auth_url = "not a url".into();
    assert!(OAuthFlow::new(cfg).authorization_url("x", "y").is_err());
}

#[tokio::test]
async fn exchange_then_fetch_profile() {
    let mut server = mockito::Server::new_async().await;
    let token_mock = server
        .mock("POST", "/oauth2/token")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            mockito::Matcher::UrlEncoded("code".into(), "the-code".into()),
            mockito::Matcher::UrlEncoded("client_secret".into(), "shh".into()),
            mockito::Matcher::UrlEncoded("redirect_uri".into(), "http://cb".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"at-1","token_type":"Bearer","expires_in":3600}"#)
        .create_async()
        .await;
    let me_mock = server
        .mock("GET", "/users/@me")
        .match_header("authorization", "Bearer at-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"77","username":"ops","avatar":null}"#)
        .create_async()
        .await;

    let flow = OAuthFlow::new(config(&server.url()));
    let tokens = flow.exchange("the-code", "http://cb").await.unwrap();
    assert_eq!(tokens.access_token.expose_secret(), "at-1");

    let me: Me = flow.fetch_userinfo(&tokens).await.unwrap();
    assert_eq!(me.id, "77");
    assert_eq!(me.username, "ops");

    token_mock.assert_async().await;
    me_mock.assert_async().await;
}

#[tokio::test]
async fn rejected_exchange_reports_status_only() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/oauth2/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","code":"the-code"}"#)
        .create_async()
        .await;

    let flow = OAuthFlow::new(config(&server.url()));
    let err = flow.exchange("the-code", "http://cb").await.unwrap_err();
    let text = err.to_string();
    assert!(text.contains("400"));
    assert!(!text.contains("the-code"));
}
