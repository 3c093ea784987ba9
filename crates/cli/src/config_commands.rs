use {
    anyhow::Result,
    clap::Subcommand,
    herald_config::{HeraldConfig, find_config_file},
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file in use, if any.
    Path,
    /// Print the effective configuration as TOML. Secrets are masked.
    Show,
}

pub fn handle_config(action: ConfigAction, config: &HeraldConfig) -> Result<()> {
    match action {
        ConfigAction::Path => {
            match find_config_file() {
                Some(path) => println!("{}", path.display()),
                None => eprintln!("No config file found; using defaults."),
            }
            Ok(())
        },
        ConfigAction::Show => {
            print!("{}", render_masked(config)?);
            Ok(())
        },
    }
}

const MASK: &str = "********";

fn render_masked(config: &HeraldConfig) -> Result<String> {
    let mut value = toml::Value::try_from(config)?;
    for (section, key) in [
        ("discord", "client_secret"),
        ("discord", "bot_token"),
        ("llm", "api_key"),
    ] {
        if let Some(slot) = value.get_mut(section).and_then(|s| s.get_mut(key)) {
            *slot = toml::Value::String(MASK.into());
        }
    }
    Ok(toml::to_string_pretty(&value)?)
}
