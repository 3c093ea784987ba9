//! In-memory operator sessions and pending OAuth `state` values.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use {
    herald_discord::{User, cdn::user_avatar_url},
    herald_oauth::state::random_token,
    serde::{Deserialize, Serialize},
    tracing::debug,
};

/// How long an authorization redirect may take before its `state` expires.
const OAUTH_STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// Signed-in operator as exposed to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
    /// Avatar PNG URL, or the default avatar.
    pub avatar: String,
    pub email: Option<String>,
}

impl UserProfile {
    pub fn from_discord(user: User, cdn_base: &str) -> Self {
        let avatar = user_avatar_url(cdn_base, &user.id, user.avatar.as_deref());
        Self {
            id: user.id,
            username: user.username,
            discriminator: user.discriminator,
            avatar,
            email: user.email,
        }
    }
}

struct Session {
    profile: UserProfile,
    expires_at: Instant,
}

/// Session tokens and OAuth states. Nothing survives a restart.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
    pending_states: Mutex<HashMap<String, Instant>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
            pending_states: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a session and return its token.
    pub fn create_session(&self, profile: UserProfile) -> String {
        let token = random_token(32);
        let session = Session {
            profile,
            expires_at: Instant::now() + self.ttl,
        };
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.clone(), session);
        token
    }

    /// Profile for a live session. Expired sessions are dropped on access.
    pub fn validate_session(&self, token: &str) -> Option<UserProfile> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        match sessions.get(token) {
            Some(s) if s.expires_at > Instant::now() => Some(s.profile.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            },
            None => None,
        }
    }

    pub fn delete_session(&self, token: &str) {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token);
    }

    /// Record a fresh OAuth `state` for the next authorization redirect.
    pub fn issue_state(&self) -> String {
        let state = herald_oauth::generate_state();
        self.pending_states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(state.clone(), Instant::now() + OAUTH_STATE_TTL);
        state
    }

    /// Single use: a state is valid at most once.
    pub fn consume_state(&self, state: &str) -> bool {
        self.pending_states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(state)
            .is_some_and(|expires_at| expires_at > Instant::now())
    }

    /// Drop expired sessions and states. Returns how many sessions went.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let removed = {
            let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
            let before = sessions.len();
            sessions.retain(|_, s| s.expires_at > now);
            before - sessions.len()
        };
        self.pending_states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|_, expires_at| *expires_at > now);
        if removed > 0 {
            debug!(removed, "expired sessions cleaned up");
        }
        removed
    }
}
