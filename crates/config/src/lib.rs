//! Configuration loading, env substitution, and environment overrides.
//!
//! Config files: `herald.toml`, `herald.yaml`, `herald.yml` or `herald.json`.
//! Searched in `./` then `~/.config/herald/`, unless a config directory
//! override is set.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-fallback}` substitution in the raw
//! file before parsing.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        apply_env_overrides, config_dir, data_dir, discover_and_load, find_config_file, load_config,
        set_config_dir,
    },
    schema::{
        DiscordConfig, HeraldConfig, LlmConfig, ServerConfig, SessionConfig, WebhooksConfig,
    },
};
