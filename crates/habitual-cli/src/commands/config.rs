//! Configuration commands for CLI.

use clap::Subcommand;
use habitual_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the value stored under a dot-separated key
    Get {
        /// Config key (e.g. "streak.policy", "habits.default_color")
        key: String,
    },
    /// Change a value and write config.toml
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole configuration as JSON
    List,
    /// Overwrite config.toml with the defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| ConfigError::UnknownKey(key.clone()))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            let path = Config::path()?;
            Config::default().save_to(&path)?;
            println!("Config reset to defaults: {}", path.display());
        }
    }
    Ok(())
}
