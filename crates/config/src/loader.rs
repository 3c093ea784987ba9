use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::HeraldConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["herald.toml", "herald.yaml", "herald.yml", "herald.json"];

/// Override for the config directory, set via `set_config_dir()`.
static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Set a custom config directory. When set, discovery only looks in this
/// directory. Each call replaces the previous override.
pub fn set_config_dir(path: PathBuf) {
    *CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner()) = Some(path);
}

fn config_dir_override() -> Option<PathBuf> {
    CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<HeraldConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply environment
/// overrides.
///
/// Search order:
/// 1. `./herald.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/herald/herald.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `HeraldConfig::default()` when nothing is found or the file
/// fails to parse.
pub fn discover_and_load() -> HeraldConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                HeraldConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            HeraldConfig::default()
        },
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Overlay well-known environment variables on top of file config.
///
/// Environment always wins. Empty values are ignored.
pub fn apply_env_overrides(config: &mut HeraldConfig, env: impl Fn(&str) -> Option<String>) {
    let get = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("DISCORD_CLIENT_ID") {
        config.discord.client_id = Some(v);
    }
    if let Some(v) = get("DISCORD_CLIENT_SECRET") {
        config.discord.client_secret = Some(Secret::new(v));
    }
    if let Some(v) = get("DISCORD_TOKEN") {
        config.discord.bot_token = Some(Secret::new(v));
    }
    if let Some(v) = get("AI_INTEGRATIONS_OPENAI_API_KEY") {
        config.llm.api_key = Some(Secret::new(v));
    }
    if let Some(v) = get("AI_INTEGRATIONS_OPENAI_BASE_URL") {
        config.llm.base_url = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = get("HERALD_BIND") {
        config.server.bind = v;
    }
    if let Some(v) = get("HERALD_PORT") {
        match v.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %v, "ignoring invalid HERALD_PORT"),
        }
    }
    if get("NODE_ENV").as_deref() == Some("production") {
        config.server.secure_cookies = true;
    }
    if let Some(v) = get("HERALD_SECURE_COOKIES") {
        config.server.secure_cookies = matches!(v.as_str(), "1" | "true" | "yes");
    }
}

/// Find the first config file in standard locations.
///
/// When a config dir override is set, only that directory is searched.
pub fn find_config_file() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return first_existing(&dir);
    }

    if let Some(p) = first_existing(Path::new(".")) {
        return Some(p);
    }

    config_dir().and_then(|dir| first_existing(&dir))
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the config directory: override, or `~/.config/herald/`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return Some(dir);
    }
    home_dir().map(|h| h.join(".config").join("herald"))
}

/// Returns the data directory: `~/.herald/`.
pub fn data_dir() -> PathBuf {
    home_dir()
        .map(|h| h.join(".herald"))
        .unwrap_or_else(|| PathBuf::from(".herald"))
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<HeraldConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
