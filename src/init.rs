use crate::config::Config;
use anyhow::{Context as _, Result as AnyResult};
use std::{
    fs::{self, File},
    io::{ErrorKind as IoErrorKind, Write},
    path::Path,
};
use tracing::{error, info};

pub const TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

/// Reads the config file, writing out a default one first if none exists.
pub fn read_config_file(cf: &str) -> AnyResult<Config> {
    match fs::read_to_string(cf) {
        Ok(contents) => {
            info!("IN | Read config file contents.");
            serde_json::from_str::<Config>(&contents)
                .with_context(|| format!("Failed to parse config file '{cf}'"))
        }
        Err(error) if error.kind() == IoErrorKind::NotFound => {
            info!("IN | Config file not found. Creating new default config file at '{cf}'");
            let config = Config::default();
            let mut new_config_file = File::create(cf)?;
            let default_contents = serde_json::to_string_pretty(&config)?;
            new_config_file.write_all(default_contents.as_bytes())?;
            info!("IN | Created new config file and wrote defaults.");
            Ok(config)
        }
        Err(error) => Err(error).with_context(|| format!("Failed to read config file '{cf}'")),
    }
}

/// Loads `path` if given (it must exist), otherwise `./.env` when present.
pub fn load_env_file(path: Option<&Path>) -> AnyResult<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file '{}'", path.display()))?;
            info!("IN | Loaded env file '{}'.", path.display());
        }
        None => {
            if let Ok(path) = dotenvy::dotenv() {
                info!("IN | Loaded env file '{}'.", path.display());
            }
        }
    }
    Ok(())
}

pub fn resolve_token(token: Option<String>) -> AnyResult<String> {
    match token.filter(|token| !token.trim().is_empty()) {
        Some(token) => Ok(token),
        None => {
            error!("IN | Environment variable '{TOKEN_VAR}' is not set.");
            anyhow::bail!("Missing bot token: set '{TOKEN_VAR}'");
        }
    }
}
