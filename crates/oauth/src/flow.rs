use {
    secrecy::{ExposeSecret, Secret},
    serde::de::DeserializeOwned,
    tracing::{debug, warn},
    url::Url,
};

use crate::{
    Error, Result,
    types::{OAuthConfig, OAuthTokens},
};

/// Drives the OAuth 2.0 authorization code flow for a confidential client.
pub struct OAuthFlow {
    config: OAuthConfig,
    client: reqwest::Client,
}

impl OAuthFlow {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    /// Build the authorization URL the browser is redirected to.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String> {
        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| Error::message(format!("invalid auth_url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("state", state);

        if !self.config.scopes.is_empty() {
            url.query_pairs_mut()
                .append_pair("scope", &self.config.scopes.join(" "));
        }

        Ok(url.to_string())
    }

    /// Exchange an authorization code for tokens.
    ///
    /// `redirect_uri` must be the exact value sent in the authorization URL.
    pub async fn exchange(&self, code: &str, redirect_uri: &str) -> Result<OAuthTokens> {
        let mut form = vec![
            ("client_id", self.config.client_id.clone()),
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
            ("redirect_uri", redirect_uri.to_string()),
        ];
        if let Some(secret) = &self.config.client_secret {
            form.push(("client_secret", secret.expose_secret().clone()));
        }

        let resp = self
            .client
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // The body may echo the code; log only the status.
            warn!(status = status.as_u16(), "authorization code exchange failed");
            return Err(Error::TokenRejected {
                status: status.as_u16(),
            });
        }

        let body = resp.json::<serde_json::Value>().await?;
        debug!("authorization code exchanged");
        parse_token_response(&body)
    }

    /// Fetch the signed-in user's profile with a bearer access token.
    pub async fn fetch_userinfo<T: DeserializeOwned>(&self, tokens: &OAuthTokens) -> Result<T> {
        let resp = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(tokens.access_token.expose_secret())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "userinfo request failed");
            return Err(Error::UserinfoRejected {
                status: status.as_u16(),
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

fn parse_token_response(resp: &serde_json::Value) -> Result<OAuthTokens> {
    let access_token = resp["access_token"]
        .as_str()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::message("missing access_token in response"))?
        .to_string();

    let expires_at = resp["expires_in"].as_u64().and_then(|secs| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs() + secs)
    });

    Ok(OAuthTokens {
        access_token: Secret::new(access_token),
        token_type: resp["token_type"].as_str().unwrap_or("Bearer").to_string(),
        refresh_token: resp["refresh_token"]
            .as_str()
            .map(|s| Secret::new(s.to_string())),
        scope: resp["scope"].as_str().map(ToString::to_string),
        expires_at,
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_requires_access_token() {
        let err = parse_token_response(&serde_json::json!({ "token_type": "Bearer" }));
        assert!(err.is_err());
    }

    #[test]
    fn token_response_computes_expiry() {
        let tokens = parse_token_response(&serde_json::json!({
            "access_token": "at",
            "token_type": "Bearer",
            "expires_in": 604800,
            "refresh_token": "rt",
            "scope": "identify email"
        }))
        .unwrap();
        assert_eq!(tokens.access_token.expose_secret(), "at");
        assert!(tokens.refresh_token.is_some());
        assert!(tokens.expires_at.unwrap() > 604800);
        assert_eq!(tokens.scope.as_deref(), Some("identify email"));
    }
}
