use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A token-bearing webhook URL (`{webhook_base}/{id}/{token}`).
///
/// Possession is enough to post into the channel, so `Debug` and `Display`
/// never show the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointRef(String);

impl EndpointRef {
    /// Validate a pasted webhook URL against the expected prefix. Does no I/O.
    ///
    /// A query, fragment or trailing `/` is dropped; any other path after the
    /// token is rejected. The stored URL is always `{base}/{id}/{token}`.
    pub fn parse(url: &str, webhook_base: &str) -> Result<Self> {
        let base = webhook_base.trim_end_matches('/');
        let rest = url
            .trim()
            .strip_prefix(base)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or(Error::InvalidEndpointFormat)?;
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        let path = path.strip_suffix('/').unwrap_or(path);

        match path.split('/').collect::<Vec<_>>()[..] {
            [id, token] if !id.is_empty() && !token.is_empty() => {
                Ok(Self::from_parts(base, id, token))
            },
            _ => Err(Error::InvalidEndpointFormat),
        }
    }

    pub fn from_parts(webhook_base: &str, id: &str, token: &str) -> Self {
        Self(format!("{}/{id}/{token}", webhook_base.trim_end_matches('/')))
    }

    /// The full URL, token included. Only for outbound requests and the
    /// operator's own listing.
    pub fn url(&self) -> &str {
        &self.0
    }

    /// Keeps the URL up to the webhook id and masks the rest. Stored URLs
    /// with a suffix after the token are masked from the token on as well.
    fn redacted(&self) -> String {
        let path = self.0.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').collect();
        if let Some(idx) = segments.iter().position(|s| *s == "webhooks") {
            let keep = (idx + 2).min(segments.len());
            return format!("{}/***", segments[..keep].join("/"));
        }
        // Unknown layout: only scheme and host survive.
        match path.split_once("://") {
            Some((scheme, rest)) => {
                let host = rest.split('/').next().unwrap_or_default();
                format!("{scheme}://{host}/***")
            },
            None => "***".into(),
        }
    }
}

impl std::fmt::Debug for EndpointRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EndpointRef").field(&self.redacted()).finish()
    }
}

impl std::fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.redacted())
    }
}
