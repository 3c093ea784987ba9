//! Discord REST plumbing for herald.
//!
//! Covers exactly what the gateway needs: guild and channel lookup, webhook
//! listing/creation, public invite and webhook metadata, and webhook
//! execution with a single embed. Everything goes through [`DiscordApi`] so
//! callers can substitute a fake in tests.

pub mod api;
pub mod cdn;
pub mod client;
pub mod embed;
pub mod error;
pub mod types;

pub use {
    api::DiscordApi,
    client::DiscordClient,
    embed::{Embed, EmbedSpec, WebhookPayload, resolve_color},
    error::{Error, Result},
    types::{Channel, Guild, Invite, User, Webhook},
};
