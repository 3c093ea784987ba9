//! Discord sign-in: authorization redirect, callback, session introspection
//! and logout.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use {
    herald_config::ServerConfig,
    herald_discord::User,
    serde::Deserialize,
    tracing::{info, warn},
};

use crate::{
    auth::UserProfile,
    auth_middleware::{SESSION_COOKIE, session_token},
    error::ApiError,
    server::AppState,
};

const CALLBACK_PATH: &str = "/auth/discord/callback";

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/discord", get(login_handler))
        .route(CALLBACK_PATH, get(callback_handler))
        .route("/auth/user", get(user_handler))
        .route("/auth/logout", post(logout_handler))
}

async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    let gw = &state.gateway;
    let flow = gw
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::internal("Discord OAuth is not configured"))?;
    let redirect_uri = redirect_uri(&gw.config.server, &headers);
    let oauth_state = gw.sessions.issue_state();
    let url = flow
        .authorization_url(&redirect_uri, &oauth_state)
        .map_err(|e| {
            warn!(error = %e, "failed to build authorization url");
            ApiError::internal("Discord OAuth is misconfigured")
        })?;
    Ok(Redirect::to(&url))
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
}

async fn callback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Redirect::to("/?error=no_code").into_response();
    };
    let gw = &state.gateway;

    let state_ok = params
        .state
        .as_deref()
        .is_some_and(|s| gw.sessions.consume_state(s));
    let Some(flow) = gw.oauth.as_ref().filter(|_| state_ok) else {
        warn!(state_ok, "oauth callback rejected");
        return Redirect::to("/?error=auth_failed").into_response();
    };

    let redirect_uri = redirect_uri(&gw.config.server, &headers);
    let user = match flow.exchange(&code, &redirect_uri).await {
        Ok(tokens) => flow.fetch_userinfo::<User>(&tokens).await,
        Err(e) => Err(e),
    };
    let user = match user {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "discord sign-in failed");
            return Redirect::to("/?error=auth_failed").into_response();
        },
    };

    let profile = UserProfile::from_discord(user, &gw.config.discord.cdn_base);
    info!(user_id = %profile.id, username = %profile.username, "operator signed in");
    let token = gw.sessions.create_session(profile);
    let cookie = session_cookie(
        &token,
        gw.sessions.ttl().as_secs(),
        gw.config.server.secure_cookies,
    );
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

async fn user_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let user = session_token(&headers).and_then(|t| state.gateway.sessions.validate_session(t));
    Json(serde_json::json!({ "user": user }))
}

async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.gateway.sessions.delete_session(token);
    }
    let cookie = session_cookie("", 0, state.gateway.config.server.secure_cookies);
    (
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "success": true })),
    )
}

/// `Set-Cookie` value for the session token. `max_age = 0` clears it.
pub fn session_cookie(token: &str, max_age: u64, secure: bool) -> String {
    let secure_attr = if secure {
        "; Secure"
    } else {
        ""
    };
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}{secure_attr}")
}

/// OAuth redirect URI for this request.
///
/// `public_url` wins. Otherwise the scheme comes from `X-Forwarded-Proto`,
/// then from the `https_host_suffixes` list, then defaults to `http`.
pub fn redirect_uri(server: &ServerConfig, headers: &HeaderMap) -> String {
    if let Some(base) = server.public_url.as_deref().filter(|u| !u.trim().is_empty()) {
        return format!("{}{CALLBACK_PATH}", base.trim_end_matches('/'));
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let forwarded = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| matches!(*v, "http" | "https"));

    let hostname = host.rsplit_once(':').map_or(host, |(h, _)| h);
    let scheme = forwarded.unwrap_or_else(|| {
        if server
            .https_host_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && hostname.ends_with(suffix.as_str()))
        {
            "https"
        } else {
            "http"
        }
    });
    format!("{scheme}://{host}{CALLBACK_PATH}")
}
