use serde::{Deserialize, Serialize};

/// Discord channel type for a regular guild text channel.
pub const GUILD_TEXT: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: u8,
}

impl Channel {
    /// Whether a webhook can post into this channel.
    pub fn is_text(&self) -> bool {
        self.kind == GUILD_TEXT
    }
}

/// Webhook object as returned by the channel webhook endpoints and by
/// `GET <webhook url>`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub guild_id: Option<String>,
}

impl std::fmt::Debug for Webhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webhook")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("channel_id", &self.channel_id)
            .field("guild_id", &self.guild_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub code: String,
    #[serde(default)]
    pub guild: Option<Guild>,
}

/// `GET /users/@me` response (OAuth `identify` + `email` scopes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_kind_predicate() {
        let text: Channel =
            serde_json::from_str(r#"{"id":"1","name":"general","type":0}"#).unwrap();
        let voice: Channel =
            serde_json::from_str(r#"{"id":"2","name":"Lounge","type":2}"#).unwrap();
        let category: Channel = serde_json::from_str(r#"{"id":"3","type":4}"#).unwrap();
        assert!(text.is_text());
        assert!(!voice.is_text());
        assert!(!category.is_text());
    }

    #[test]
    fn webhook_debug_hides_token() {
        let hook: Webhook =
            serde_json::from_str(r#"{"id":"9","name":"Acme","token":"t0ps3cret"}"#).unwrap();
        assert!(!format!("{hook:?}").contains("t0ps3cret"));
    }

    #[test]
    fn invite_tolerates_missing_guild() {
        let invite: Invite = serde_json::from_str(r#"{"code":"abc"}"#).unwrap();
        assert!(invite.guild.is_none());
    }
}
