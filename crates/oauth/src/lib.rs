//! OAuth 2.0 authorization-code flow against the identity provider
//! (Discord), used to sign operators in.

pub mod defaults;
pub mod error;
pub mod flow;
pub mod state;
pub mod types;

pub use {
    defaults::discord_oauth_config,
    error::{Error, Result},
    flow::OAuthFlow,
    state::generate_state,
    types::{OAuthConfig, OAuthTokens},
};
