//! Typed repository traits over the persisted store.
//!
//! The engine re-reads current state through these traits on every decision;
//! nothing is cached across invocations. Implementations must serialize
//! concurrent writes to the same row and may be swapped for in-memory
//! doubles in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guildmail_error::StoreError;

/// A message row to append to the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Platform message id.
    pub id: i64,
    /// Guild the message was posted in.
    pub guild_id: i64,
    /// Channel the message was posted in.
    pub channel_id: i64,
    /// Message author.
    pub author_id: i64,
    /// Message text.
    pub content: String,
}

impl From<&crate::MessageEvent> for NewMessage {
    fn from(event: &crate::MessageEvent) -> Self {
        Self {
            id: event.id,
            guild_id: event.guild_id,
            channel_id: event.channel_id,
            author_id: event.author_id,
            content: event.content.clone(),
        }
    }
}

/// Append-only message log.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message to the log.
    async fn insert_message(&self, message: &NewMessage) -> Result<(), StoreError>;
}

/// (user, guild, email) subscription rows.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Insert a subscription row. Returns `false` without modifying state
    /// when the exact triple already exists.
    async fn insert_subscription(
        &self,
        user_id: i64,
        guild_id: i64,
        email: &str,
    ) -> Result<bool, StoreError>;

    /// Delete every subscription row for the user in the guild, returning
    /// the number of rows removed. Zero is not an error.
    async fn delete_subscriptions(
        &self,
        user_id: i64,
        guild_id: i64,
    ) -> Result<usize, StoreError>;

    /// One email registered by the user in the guild, if any.
    async fn find_email(&self, user_id: i64, guild_id: i64) -> Result<Option<String>, StoreError>;

    /// All distinct subscriber emails for the guild.
    async fn distinct_emails(&self, guild_id: i64) -> Result<Vec<String>, StoreError>;
}

/// Per-guild last-send timestamp, at most one row per guild.
#[async_trait]
pub trait CooldownStore: Send + Sync {
    /// The guild's last send timestamp, if one has been recorded.
    async fn last_sent_at(&self, guild_id: i64) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Upsert the guild's last send timestamp (last write wins).
    async fn upsert_last_sent_at(
        &self,
        guild_id: i64,
        sent_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// Per-guild development-mode flag.
#[async_trait]
pub trait GuildModeStore: Send + Sync {
    /// The guild's development-mode flag, `None` when no row exists.
    async fn dev_mode(&self, guild_id: i64) -> Result<Option<bool>, StoreError>;

    /// Upsert the guild's development-mode flag.
    async fn upsert_dev_mode(&self, guild_id: i64, dev_mode: bool) -> Result<(), StoreError>;
}

/// Per-guild excluded channel set.
#[async_trait]
pub trait ExclusionStore: Send + Sync {
    /// Whether the (guild, channel) pair is present.
    async fn contains(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError>;

    /// Insert the pair. Returns `false` without modifying state when the
    /// pair is already present.
    async fn insert(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError>;

    /// Delete the pair. Returns `false` when the pair was absent.
    async fn delete(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError>;

    /// All excluded channel ids for the guild.
    async fn list(&self, guild_id: i64) -> Result<Vec<i64>, StoreError>;
}
