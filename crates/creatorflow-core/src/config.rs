use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CreatorFlowError;

/// Top-level CreatorFlow configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub creatorflow: GeneralConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Empty means "read TELEGRAM_BOT_TOKEN from the environment".
    #[serde(default)]
    pub bot_token: String,
    /// Public HTTPS URL to register as the webhook on start. Empty skips registration.
    #[serde(default)]
    pub webhook_url: String,
    /// Shared secret Telegram echoes in X-Telegram-Bot-Api-Secret-Token.
    /// Empty disables the check.
    #[serde(default)]
    pub webhook_secret: String,
    /// Dashboard URL the "Website Link" button replies with.
    #[serde(default = "default_site_url")]
    pub site_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            webhook_url: String::new(),
            webhook_secret: String::new(),
            site_url: default_site_url(),
        }
    }
}

impl TelegramConfig {
    /// Resolve the bot token: config value first, then TELEGRAM_BOT_TOKEN.
    pub fn resolve_token(&self) -> Option<String> {
        if !self.bot_token.is_empty() {
            return Some(self.bot_token.clone());
        }
        std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
    }
}

/// Webhook HTTP server config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_data_dir() -> String {
    "~/.creatorflow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_site_url() -> String {
    "https://creatorflow.app".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_db_path() -> String {
    "~/.creatorflow/data/creatorflow.db".to_string()
}

/// Expand a leading `~` to the home directory.
pub fn shellexpand(path: &str) -> String {
    let Some(home) = std::env::var_os("HOME") else {
        return path.to_string();
    };
    let home = home.to_string_lossy();

    if path == "~" {
        home.into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, CreatorFlowError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| CreatorFlowError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CreatorFlowError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
