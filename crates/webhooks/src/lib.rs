//! Channel-to-webhook registry for herald.
//!
//! [`WebhookRegistry`] maps normalized channel keys to token-bearing webhook
//! URLs for a single workspace. [`WebhookService`] fills it, either by
//! scanning every text channel of a guild with the bot credential or by
//! accepting one pasted webhook URL, and delivers embeds through it.

pub mod channel_key;
pub mod delivery;
pub mod endpoint;
pub mod error;
pub mod invite;
pub mod provision;
pub mod registry;
pub mod service;
pub mod store;

pub use {
    channel_key::ChannelKey,
    delivery::DeliveryRequest,
    endpoint::EndpointRef,
    error::{Error, Result},
    invite::normalize_invite,
    provision::{ManualReport, ProvisionReport},
    registry::{RegistrySnapshot, WebhookRegistry, Workspace},
    service::{ServiceSettings, WebhookService},
    store::RegistryStore,
};
