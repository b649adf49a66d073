//! Configuration module for the bot.
//!
//! Loads configuration from environment variables (a `.env` file is honoured).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Bot running mode
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Owner identities.
///
/// Owners can be listed in two forms: the phone/account based id and the
/// linked-device id. A sender matching either form is an owner.
#[derive(Debug, Clone, Default)]
pub struct Owners {
    pub numbers: Vec<String>,
    pub linked_ids: Vec<String>,
}

impl Owners {
    pub fn contains(&self, identity: &str) -> bool {
        self.numbers.iter().chain(&self.linked_ids).any(|o| o == identity)
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty() && self.linked_ids.is_empty()
    }
}

/// Rate limiter thresholds.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_messages: u32,
    pub interval: Duration,
    pub block_duration: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_messages: 10,
            interval: Duration::from_millis(60_000),
            block_duration: Duration::from_millis(300_000),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Display name used in menus and info.
    pub bot_name: String,
    /// Language for bot replies (`en` or `ar`).
    pub lang: String,
    /// Command prefixes, checked in order.
    pub prefixes: Vec<String>,
    pub owners: Owners,

    // Feature toggles
    pub auto_read: bool,
    pub auto_typing: bool,
    pub log_messages: bool,
    pub respond_in_groups: bool,
    pub respond_in_private: bool,

    /// Ambient supplication replies to Arabic text.
    pub ambient_reply: bool,
    /// Reply to one in `ambient_chance` qualifying messages. 0 disables.
    pub ambient_chance: u32,

    pub rate_limit: RateLimitConfig,

    pub quiz_timeout: Duration,
    pub quiz_path: PathBuf,

    /// Directory holding the persisted chat/user sets.
    pub data_dir: PathBuf,

    pub sticker_pack: String,
    pub sticker_author: String,

    // Quran content provider
    pub quran_api_url: String,
    pub quran_page_image_url: String,
    pub quran_reciter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_mode = match get("BOT_MODE").map(|m| m.to_lowercase()).as_deref() {
            Some("webhook") => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = get("WEBHOOK_URL");

        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            return Err(ConfigError::Missing("WEBHOOK_URL"));
        }

        let bot_name = get("BOT_NAME").unwrap_or_else(|| "Nur".to_string());

        let lang = get("BOT_LANG").unwrap_or_else(|| "en".to_string()).to_lowercase();
        if lang != "en" && lang != "ar" {
            return Err(ConfigError::Invalid { key: "BOT_LANG", value: lang });
        }

        let prefixes = get("PREFIXES")
            .map(|raw| split_list(&raw))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| vec!["/".to_string()]);

        let owners = Owners {
            numbers: get("OWNER_NUMBER").map(|raw| split_list(&raw)).unwrap_or_default(),
            linked_ids: get("OWNER_LID").map(|raw| split_list(&raw)).unwrap_or_default(),
        };

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            max_messages: parse_or(&get, "RATE_LIMIT_MAX", defaults.max_messages)?,
            interval: Duration::from_millis(parse_or(
                &get,
                "RATE_LIMIT_INTERVAL_MS",
                defaults.interval.as_millis() as u64,
            )?),
            block_duration: Duration::from_millis(parse_or(
                &get,
                "RATE_LIMIT_BLOCK_MS",
                defaults.block_duration.as_millis() as u64,
            )?),
        };

        let sticker_pack = get("STICKER_PACK").unwrap_or_else(|| bot_name.clone());
        let sticker_author = get("STICKER_AUTHOR").unwrap_or_else(|| bot_name.clone());

        Ok(Self {
            bot_token: get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?,
            bot_mode,
            webhook_url,
            webhook_port: parse_or(&get, "WEBHOOK_PORT", 8443)?,
            webhook_secret: get("WEBHOOK_SECRET"),
            bot_name,
            lang,
            prefixes,
            owners,
            auto_read: parse_bool(&get, "AUTO_READ", false)?,
            auto_typing: parse_bool(&get, "AUTO_TYPING", false)?,
            log_messages: parse_bool(&get, "LOG_MESSAGES", true)?,
            respond_in_groups: parse_bool(&get, "RESPOND_IN_GROUPS", true)?,
            respond_in_private: parse_bool(&get, "RESPOND_IN_PRIVATE", true)?,
            ambient_reply: parse_bool(&get, "AMBIENT_REPLY", true)?,
            ambient_chance: parse_or(&get, "AMBIENT_CHANCE", 20)?,
            rate_limit,
            quiz_timeout: Duration::from_secs(parse_or(&get, "QUIZ_TIMEOUT_SECS", 30)?),
            quiz_path: get("QUIZ_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/quiz.json")),
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            sticker_pack,
            sticker_author,
            quran_api_url: get("QURAN_API_URL")
                .unwrap_or_else(|| "https://api.alquran.cloud/v1".to_string()),
            quran_page_image_url: get("QURAN_PAGE_IMAGE_URL").unwrap_or_else(|| {
                "https://android.quran.com/data/width_1024/page{page}.png".to_string()
            }),
            quran_reciter: get("QURAN_RECITER").unwrap_or_else(|| "ar.alafasy".to_string()),
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('+').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_bool<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: v }),
        },
    }
}

#[cfg(test)]
impl Config {
    /// Configuration with defaults and a dummy token, for tests.
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| (key == "BOT_TOKEN").then(|| "test-token".to_string()))
            .expect("default config is valid")
    }
}
