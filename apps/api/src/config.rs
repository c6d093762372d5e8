use std::str::FromStr;

use anyhow::{Context, Result};

use crate::resume::upload::DEFAULT_MAX_UPLOAD_BYTES;

const DEFAULT_CONVERSATION_TTL_SECS: u64 = 30 * 60;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Cosmetic delay per assistant message, in milliseconds. 0 disables pacing.
    pub assistant_delay_ms: u64,
    pub max_upload_bytes: u64,
    pub max_conversations: usize,
    /// Idle time after which a conversation, finished or not, may be evicted.
    pub conversation_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            assistant_delay_ms: parse_env("ASSISTANT_DELAY_MS", 0)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            max_conversations: parse_env("MAX_CONVERSATIONS", 1000)?,
            conversation_ttl_secs: parse_env(
                "CONVERSATION_TTL_SECS",
                DEFAULT_CONVERSATION_TTL_SECS,
            )?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            assistant_delay_ms: 0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_conversations: 1000,
            conversation_ttl_secs: DEFAULT_CONVERSATION_TTL_SECS,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
