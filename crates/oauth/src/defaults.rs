use herald_config::DiscordConfig;

use crate::types::OAuthConfig;

/// Build the Discord OAuth config from the `[discord]` config section.
///
/// Returns `None` when no client id is configured; sign-in is then
/// unavailable and `/auth/discord` reports it.
pub fn discord_oauth_config(discord: &DiscordConfig) -> Option<OAuthConfig> {
    let client_id = discord.client_id.clone().filter(|id| !id.trim().is_empty())?;
    Some(OAuthConfig {
        client_id,
        client_secret: discord.client_secret.clone(),
        auth_url: discord.authorize_url.clone(),
        token_url: discord.token_url.clone(),
        userinfo_url: format!("{}/users/@me", discord.api_base.trim_end_matches('/')),
        scopes: discord.scopes.clone(),
    })
}
