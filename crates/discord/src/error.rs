use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-success response. `message` is the remote `message` field, `None`
    /// when the body carried none.
    #[error("discord api error ({status}): {}", api_detail(.status, .message))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("discord bot token not configured")]
    MissingBotToken,
}

/// Remote message, else the canonical status reason.
fn api_detail(status: &u16, message: &Option<String>) -> String {
    message
        .as_deref()
        .or_else(|| {
            reqwest::StatusCode::from_u16(*status)
                .ok()
                .and_then(|s| s.canonical_reason())
        })
        .unwrap_or("request failed")
        .to_string()
}

impl Error {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The remote-supplied message, when Discord sent one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
