//! Configuration for the guildmail binary.

use guildmail_error::{ConfigError, GuildmailResult};
use guildmail_mail::MailerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration, loaded from a TOML file.
///
/// Secrets (`DISCORD_TOKEN`, `DATABASE_URL`, `MAIL_API_KEY`) stay in the
/// environment and never appear in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildmailConfig {
    /// Mail transport configuration
    pub mail: MailerConfig,
    /// Discord adapter configuration
    #[serde(default)]
    pub discord: DiscordConfig,
}

/// Discord adapter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Channel to announce startup in, if any.
    pub log_channel_id: Option<u64>,
}

impl GuildmailConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> GuildmailResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?)
    }
}
