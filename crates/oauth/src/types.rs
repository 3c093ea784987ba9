use {
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

/// OAuth 2.0 provider configuration for a confidential client.
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    pub auth_url: String,
    pub token_url: String,
    /// Endpoint returning the signed-in user's profile.
    pub userinfo_url: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Tokens returned by the code exchange. Never persisted.
#[derive(Clone)]
pub struct OAuthTokens {
    pub access_token: Secret<String>,
    pub token_type: String,
    pub refresh_token: Option<Secret<String>>,
    pub scope: Option<String>,
    /// Unix timestamp when the access token expires.
    pub expires_at: Option<u64>,
}

impl std::fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
