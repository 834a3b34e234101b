use clap::Parser;
use std::path::PathBuf;

/// Discord bot with greetings, weather lookups and delayed messages.
#[derive(Debug, Parser)]
#[command(name = "nyan_messenger")]
pub struct Args {
    /// JSON config file. Created with defaults if it does not exist.
    #[arg(short = 'c', long = "config-file-path", default_value = "config.json")]
    pub config_file_path: String,
    /// Dotenv file to load the bot token from, instead of `./.env`.
    #[arg(short = 'e', long = "env-file")]
    pub env_file: Option<PathBuf>,
}
