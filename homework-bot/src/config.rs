use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::BotError;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Overrides the location of the TOML settings file.
pub const CONFIG_PATH_ENV: &str = "HOMEWORK_BOT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Secrets read once from the environment at startup.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve every required variable through `lookup`. Empty values count as
    /// missing, and all missing names are reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |name: &str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let practicum_token = read(PRACTICUM_TOKEN);
        let telegram_token = read(TELEGRAM_TOKEN);
        let telegram_chat_id = read(TELEGRAM_CHAT_ID);

        if !missing.is_empty() {
            return Err(BotError::MissingEnv(missing));
        }

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Non-secret runtime settings, loaded from `config.toml` when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Pause between two poll cycles, in seconds
    #[serde(default = "default_retry_period_secs")]
    pub retry_period_secs: u64,

    /// Timeout for a single homework API request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_retry_period_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            retry_period_secs: default_retry_period_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            endpoint: default_endpoint(),
            telegram_api_url: default_telegram_api_url(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
        }
    }
}

impl BotConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: BotConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub static CONFIG: OnceLock<BotConfig> = OnceLock::new();

pub fn read_config() -> anyhow::Result<&'static BotConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = BotConfig::load_or_default(&path)?;

    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Configuration has already been loaded"))?;
    CONFIG
        .get()
        .context("Configuration is unavailable after loading")
}
