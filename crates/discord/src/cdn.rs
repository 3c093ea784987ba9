//! CDN URL helpers for guild icons and user avatars.

/// Guild icon PNG, or the default avatar when the guild has no icon.
pub fn guild_icon_url(cdn_base: &str, guild_id: &str, icon: Option<&str>) -> String {
    match icon {
        Some(hash) if !hash.is_empty() => format!("{cdn_base}/icons/{guild_id}/{hash}.png"),
        _ => default_avatar_url(cdn_base),
    }
}

/// User avatar PNG, or the default avatar when the user has none.
pub fn user_avatar_url(cdn_base: &str, user_id: &str, avatar: Option<&str>) -> String {
    match avatar {
        Some(hash) if !hash.is_empty() => format!("{cdn_base}/avatars/{user_id}/{hash}.png"),
        _ => default_avatar_url(cdn_base),
    }
}

pub fn default_avatar_url(cdn_base: &str) -> String {
    format!("{cdn_base}/embed/avatars/0.png")
}
