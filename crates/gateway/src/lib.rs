//! Gateway: the HTTP surface of herald.
//!
//! Lifecycle:
//! 1. Load config and the persisted webhook registry
//! 2. Build the Discord client, LLM provider and OAuth flow
//! 3. Serve auth, setup and messaging routes until shutdown
//!
//! Registry, provisioning and delivery live in `herald-webhooks`; this crate
//! only handles sessions, request validation and error mapping.

pub mod auth;
pub mod auth_middleware;
pub mod auth_routes;
pub mod error;
pub mod message_routes;
pub mod server;
pub mod setup_routes;
pub mod state;

pub use {
    error::ApiError,
    server::{AppState, build_gateway_app, start_gateway},
    state::GatewayState,
};
