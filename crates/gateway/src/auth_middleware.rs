use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{auth::UserProfile, error::ApiError, server::AppState, state::GatewayState};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "herald_session";

/// Axum extractor that validates the session cookie and yields the signed-in
/// operator. Rejects with 401 when the session is missing or expired.
pub struct AuthSession(pub UserProfile);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    Arc<GatewayState>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gw = Arc::<GatewayState>::from_ref(state);
        session_token(&parts.headers)
            .and_then(|token| gw.sessions.validate_session(token))
            .map(AuthSession)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Middleware that rejects requests without a live session.
pub async fn require_auth(
    State(state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let authenticated = session_token(request.headers())
        .and_then(|token| state.gateway.sessions.validate_session(token))
        .is_some();
    if authenticated {
        return next.run(request).await;
    }
    ApiError::unauthorized().into_response()
}

/// Session token from the request's `Cookie` header.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let cookie_header = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    parse_cookie(cookie_header, SESSION_COOKIE).filter(|t| !t.is_empty())
}

/// Parse a specific cookie value from a Cookie header string.
pub fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(name)
            && let Some(value) = value.strip_prefix('=')
        {
            return Some(value);
        }
    }
    None
}
