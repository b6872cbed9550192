//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// ScribeBooth - record audio sessions and upload them for transcription
#[derive(Parser, Debug)]
#[command(name = "scribe-booth")]
#[command(version = "0.1.0")]
#[command(about = "Record audio sessions and upload them for transcription")]
#[command(long_about = None)]
pub struct Cli {
    /// Input device to record from (exact label from `devices`)
    #[arg(short = 'd', long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Title for the recording (defaults to a timestamped title)
    #[arg(short = 't', long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Show desktop notifications while recording
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Backend server URL
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available input devices
    Devices,
    /// Manage saved transcription profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Profile actions
#[derive(Subcommand, Debug)]
pub enum ProfilesAction {
    /// List saved profiles
    List,
    /// Delete a profile by id
    Delete {
        /// Profile id
        id: String,
    },
    /// Show the default profile
    Default,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed recording options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub device: Option<String>,
    pub title: Option<String>,
    pub notify: bool,
    pub server_url: String,
    pub api_key: String,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["api_key", "server_url", "device", "notify"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
