use std::error::Error as StdError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Guild metadata or its channel list could not be read with the bot
    /// credential. Fatal to a full provisioning run.
    #[error("failed to fetch server info: {message}")]
    WorkspaceLookup {
        status: Option<u16>,
        message: String,
    },

    #[error("invalid invite link or invite has expired")]
    InviteResolution { status: Option<u16> },

    #[error("invalid webhook URL, the webhook may have been deleted")]
    EndpointUnreachable { status: Option<u16> },

    #[error("invalid webhook URL format")]
    InvalidEndpointFormat,

    #[error("invalid invite link: {message}")]
    InvalidInvite { message: String },

    /// Every text channel failed, or the guild has none.
    #[error("no webhooks could be configured ({attempted} text channels tried)")]
    NoChannelsProvisioned { attempted: usize },

    #[error("invalid channel selected: {key}")]
    UnknownChannel { key: String },

    #[error("at least one embed field is required")]
    EmptyEmbed,

    /// Upstream rejected the execute-webhook call. `message` is the remote
    /// message when one was sent.
    #[error("failed to send message: {message}")]
    DeliveryFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("discord bot token not configured")]
    MissingBotToken,

    #[error("registry store failed: {context}: {source}")]
    Store {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn invalid_invite(message: impl std::fmt::Display) -> Self {
        Self::InvalidInvite {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn store(context: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Store {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Classify a failed guild or channel-list lookup.
    pub(crate) fn workspace_lookup(err: herald_discord::Error) -> Self {
        match err {
            herald_discord::Error::MissingBotToken => Self::MissingBotToken,
            other => Self::WorkspaceLookup {
                status: other.status(),
                message: other
                    .remote_message()
                    .map_or_else(|| other.to_string(), String::from),
            },
        }
    }
}
