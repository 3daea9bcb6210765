//! `set` and `unset` subcommands.

use crate::core::config::{path_display, Config, ConfigKey, ConfigValueError};
use std::error::Error;

/// Apply `key = value` to `config` and describe the change.
pub fn apply_set(config: &mut Config, key: &str, value: &str) -> Result<String, ConfigValueError> {
    let key: ConfigKey = key.parse()?;
    key.apply(config, value)?;
    Ok(format!("✅ Set {} to: {}", key.name(), value.trim()))
}

pub fn apply_unset(config: &mut Config, key: &str) -> Result<String, ConfigValueError> {
    let key: ConfigKey = key.parse()?;
    key.clear(config);
    Ok(format!("✅ Unset {}", key.name()))
}

pub fn run_set(key: Option<String>, value: Vec<String>) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    let key = match key {
        Some(key) if !value.is_empty() => key,
        _ => {
            config.print_all();
            println!("\nConfig file: {}", path_display(Config::get_config_path()?));
            return Ok(());
        }
    };

    match apply_set(&mut config, &key, &value.join(" ")) {
        Ok(message) => {
            config.save()?;
            println!("{message}");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    }
}

pub fn run_unset(key: String) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    match apply_unset(&mut config, &key) {
        Ok(message) => {
            config.save()?;
            println!("{message}");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    }
}
