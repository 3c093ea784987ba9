//! Chat completion backends.

pub mod openai;

use std::sync::Arc;

use {herald_config::LlmConfig, secrecy::ExposeSecret};

pub use openai::OpenAiProvider;

use crate::model::LlmProvider;

/// Build the configured provider. Returns `None` when no API key is set, in
/// which case text polishing is unavailable.
pub fn provider_from_config(config: &LlmConfig) -> Option<Arc<dyn LlmProvider>> {
    let key = config
        .api_key
        .as_ref()
        .filter(|k| !k.expose_secret().trim().is_empty())?;
    Some(Arc::new(OpenAiProvider::new(
        key.clone(),
        config.model.clone(),
        config.base_url.clone(),
        config.temperature,
        config.max_tokens,
    )))
}
