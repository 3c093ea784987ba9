//! Normalized channel identifiers used as registry keys.

use serde::{Deserialize, Serialize};

/// Lower-case ASCII alphanumerics joined by single underscores.
///
/// Normalization is idempotent: a key normalizes to itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelKey(String);

impl ChannelKey {
    /// Key for a human-readable channel or webhook name. `None` when the name
    /// has no ASCII letters or digits at all.
    pub fn normalize(name: &str) -> Option<Self> {
        let mut key = String::with_capacity(name.len());
        let mut pending_sep = false;
        for ch in name.chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_sep && !key.is_empty() {
                    key.push('_');
                }
                pending_sep = false;
                key.push(ch.to_ascii_lowercase());
            } else {
                pending_sep = true;
            }
        }
        (!key.is_empty()).then_some(Self(key))
    }

    /// Like [`normalize`](Self::normalize), trying `fallback` when `name`
    /// yields nothing and finally settling on `webhook`.
    pub fn normalize_or(name: &str, fallback: &str) -> Self {
        Self::normalize(name)
            .or_else(|| Self::normalize(fallback))
            .unwrap_or_else(|| Self("webhook".into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Presentation label: separators become spaces and each word is
    /// title-cased (`general_chat` → `General Chat`).
    pub fn display_label(&self) -> String {
        self.0
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for ChannelKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ChannelKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
