//! Invite reference normalization.

use crate::{Error, Result};

/// Recognized invite URL prefixes, longest first so `https://discord.gg/`
/// is stripped before the bare `discord.gg/`.
const INVITE_PREFIXES: &[&str] = &[
    "https://discord.com/invite/",
    "http://discord.com/invite/",
    "https://discord.gg/",
    "http://discord.gg/",
    "discord.com/invite/",
    "discord.gg/",
];

/// Reduce a pasted invite link or bare code to the invite code.
///
/// Strips one known prefix and anything after `?` or `#`. Fails when no code
/// remains or the remainder still contains a path separator.
pub fn normalize_invite(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let without_prefix = INVITE_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);
    let code = without_prefix
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/')
        .trim();

    if code.is_empty() {
        return Err(Error::invalid_invite("no invite code found"));
    }
    if code.contains('/') || code.chars().any(char::is_whitespace) {
        return Err(Error::invalid_invite("unrecognized invite link"));
    }
    Ok(code.to_string())
}
