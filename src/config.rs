use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_RESPONSES_PATH: &str = "data/autoresponses.json";
pub const DEFAULT_BANNED_WORDS: [&str; 3] = ["badword1", "badword2", "discord.gg"];
pub const DEFAULT_SPAM_THRESHOLD: usize = 5;
pub const DEFAULT_SPAM_WINDOW_SECS: u64 = 10;

// Settings read once at startup. The token and application id are required;
// everything else has a default.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub application_id: u64,
    pub guild_id: Option<u64>,
    pub responses_path: PathBuf,
    pub welcome_channel_id: Option<u64>,
    pub auto_role_id: Option<u64>,
    pub moderation: ModerationConfig,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ModerationConfig {
    pub banned_words: Vec<String>,
    pub block_links: bool,
    pub spam_threshold: usize,
    pub spam_window: Duration,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        ModerationConfig {
            banned_words: DEFAULT_BANNED_WORDS.iter().map(|w| w.to_string()).collect(),
            block_links: true,
            spam_threshold: DEFAULT_SPAM_THRESHOLD,
            spam_window: Duration::from_secs(DEFAULT_SPAM_WINDOW_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    // Builds the config from any key lookup, so tests don't need to touch
    // the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required(&lookup, "DISCORD_TOKEN")?;
        let application_id = parse(&lookup, "DISCORD_APPLICATION_ID")?
            .ok_or_else(|| missing("DISCORD_APPLICATION_ID"))?;

        let defaults = ModerationConfig::default();
        let banned_words = match optional(&lookup, "MODERATION_WORDS") {
            Some(raw) => raw
                .split(',')
                .map(|word| word.trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
            None => defaults.banned_words,
        };
        let moderation = ModerationConfig {
            banned_words,
            block_links: parse(&lookup, "MODERATION_BLOCK_LINKS")?.unwrap_or(defaults.block_links),
            spam_threshold: parse(&lookup, "SPAM_THRESHOLD")?.unwrap_or(defaults.spam_threshold),
            spam_window: parse(&lookup, "SPAM_WINDOW_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.spam_window),
        };

        Ok(Config {
            token,
            application_id,
            guild_id: parse(&lookup, "DISCORD_GUILD_ID")?,
            responses_path: optional(&lookup, "AUTORESPONSES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESPONSES_PATH)),
            welcome_channel_id: parse(&lookup, "WELCOME_CHANNEL_ID")?,
            auto_role_id: parse(&lookup, "AUTO_ROLE_ID")?,
            moderation,
        })
    }
}

// The token never shows up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("guild_id", &self.guild_id)
            .field("responses_path", &self.responses_path)
            .field("welcome_channel_id", &self.welcome_channel_id)
            .field("auto_role_id", &self.auto_role_id)
            .field("moderation", &self.moderation)
            .finish()
    }
}

fn missing(key: &str) -> Error {
    Error::Config(format!("Expected a {} in the environment.", key))
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| missing(key))
}

fn parse<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match optional(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("The {} value `{}` is malformed.", key, raw))),
        None => Ok(None),
    }
}
