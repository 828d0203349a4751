//! Row and insertable models for the guildmail tables.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Database row for the messages log.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    pub id: i64,
    pub guild_id: i64,
    pub channel_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for the messages log.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessageRow {
    pub id: i64,
    pub guild_id: i64,
    pub channel_id: i64,
    pub author_id: i64,
    pub content: String,
}

impl From<&guildmail_core::store::NewMessage> for NewMessageRow {
    fn from(message: &guildmail_core::store::NewMessage) -> Self {
        Self {
            id: message.id,
            guild_id: message.guild_id,
            channel_id: message.channel_id,
            author_id: message.author_id,
            content: message.content.clone(),
        }
    }
}

/// Database row for subscriptions.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubscriptionRow {
    pub id: i32,
    pub user_id: i64,
    pub guild_id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for subscriptions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscription<'a> {
    pub user_id: i64,
    pub guild_id: i64,
    pub email: &'a str,
}

/// Database row for the per-guild cooldown timestamp.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::cooldowns)]
#[diesel(primary_key(guild_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CooldownRow {
    pub guild_id: i64,
    pub last_sent_at: DateTime<Utc>,
}

/// Database row for the per-guild development-mode flag.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::guild_modes)]
#[diesel(primary_key(guild_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GuildModeRow {
    pub guild_id: i64,
    pub dev_mode: bool,
}

/// Database row for excluded channels.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::excluded_channels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExcludedChannelRow {
    pub id: i32,
    pub guild_id: i64,
    pub channel_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for excluded channels.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::excluded_channels)]
pub struct NewExcludedChannel {
    pub guild_id: i64,
    pub channel_id: i64,
}
