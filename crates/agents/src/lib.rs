//! Language-model access for herald: an OpenAI-compatible chat completion
//! provider and the embed text polishing built on it.

pub mod error;
pub mod model;
pub mod polish;
pub mod prompt;
pub mod providers;

pub use {
    error::{Error, Result},
    model::{ChatMessage, LlmProvider},
    polish::{PolishFields, polish},
    providers::provider_from_config,
};
