//! PostgreSQL implementation of the core store traits.

use crate::models::{NewExcludedChannel, NewMessageRow, NewSubscription};
use crate::schema::{cooldowns, excluded_channels, guild_modes, messages, subscriptions};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use guildmail_core::store::{
    CooldownStore, ExclusionStore, GuildModeStore, MessageStore, NewMessage, SubscriberStore,
};
use guildmail_error::StoreError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// PostgreSQL repository backing every core store trait.
///
/// The connection is wrapped in `Arc<Mutex>` for async access. This is a
/// simple implementation; for high-concurrency deployments, substitute a
/// connection pool such as r2d2 behind the same traits.
pub struct PostgresStore {
    conn: Arc<Mutex<PgConnection>>,
}

impl PostgresStore {
    /// Create a store over a PostgreSQL connection.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a store from a shared connection.
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl MessageStore for PostgresStore {
    /// Append a message to the log.
    ///
    /// Uses INSERT ... ON CONFLICT DO NOTHING so a redelivered event cannot
    /// fail the pipeline.
    #[instrument(skip(self, message), fields(message_id = message.id, guild_id = message.guild_id))]
    async fn insert_message(&self, message: &NewMessage) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(messages::table)
            .values(NewMessageRow::from(message))
            .on_conflict(messages::id)
            .do_nothing()
            .execute(&mut *conn)
            .map_err(StoreError::from)?;

        Ok(())
    }
}

#[async_trait]
impl SubscriberStore for PostgresStore {
    #[instrument(skip(self, email))]
    async fn insert_subscription(
        &self,
        user_id: i64,
        guild_id: i64,
        email: &str,
    ) -> Result<bool, StoreError> {
        let mut conn = self.conn.lock().await;

        let inserted = diesel::insert_into(subscriptions::table)
            .values(NewSubscription {
                user_id,
                guild_id,
                email,
            })
            .on_conflict((
                subscriptions::user_id,
                subscriptions::guild_id,
                subscriptions::email,
            ))
            .do_nothing()
            .execute(&mut *conn)
            .map_err(StoreError::from)?;

        Ok(inserted > 0)
    }

    #[instrument(skip(self))]
    async fn delete_subscriptions(
        &self,
        user_id: i64,
        guild_id: i64,
    ) -> Result<usize, StoreError> {
        let mut conn = self.conn.lock().await;

        diesel::delete(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user_id))
                .filter(subscriptions::guild_id.eq(guild_id)),
        )
        .execute(&mut *conn)
        .map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn find_email(&self, user_id: i64, guild_id: i64) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.lock().await;

        subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::guild_id.eq(guild_id))
            .select(subscriptions::email)
            .first(&mut *conn)
            .optional()
            .map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn distinct_emails(&self, guild_id: i64) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.lock().await;

        subscriptions::table
            .filter(subscriptions::guild_id.eq(guild_id))
            .select(subscriptions::email)
            .distinct()
            .load(&mut *conn)
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl CooldownStore for PostgresStore {
    #[instrument(skip(self))]
    async fn last_sent_at(&self, guild_id: i64) -> Result<Option<DateTime<Utc>>, StoreError> {
        let mut conn = self.conn.lock().await;

        cooldowns::table
            .find(guild_id)
            .select(cooldowns::last_sent_at)
            .first(&mut *conn)
            .optional()
            .map_err(StoreError::from)
    }

    /// Upsert the guild's last send timestamp (replace semantics, one row
    /// per guild).
    #[instrument(skip(self))]
    async fn upsert_last_sent_at(
        &self,
        guild_id: i64,
        sent_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(cooldowns::table)
            .values((
                cooldowns::guild_id.eq(guild_id),
                cooldowns::last_sent_at.eq(sent_at),
            ))
            .on_conflict(cooldowns::guild_id)
            .do_update()
            .set(cooldowns::last_sent_at.eq(sent_at))
            .execute(&mut *conn)
            .map_err(StoreError::from)?;

        Ok(())
    }
}

#[async_trait]
impl GuildModeStore for PostgresStore {
    #[instrument(skip(self))]
    async fn dev_mode(&self, guild_id: i64) -> Result<Option<bool>, StoreError> {
        let mut conn = self.conn.lock().await;

        guild_modes::table
            .find(guild_id)
            .select(guild_modes::dev_mode)
            .first(&mut *conn)
            .optional()
            .map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn upsert_dev_mode(&self, guild_id: i64, dev_mode: bool) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(guild_modes::table)
            .values((
                guild_modes::guild_id.eq(guild_id),
                guild_modes::dev_mode.eq(dev_mode),
            ))
            .on_conflict(guild_modes::guild_id)
            .do_update()
            .set(guild_modes::dev_mode.eq(dev_mode))
            .execute(&mut *conn)
            .map_err(StoreError::from)?;

        Ok(())
    }
}

#[async_trait]
impl ExclusionStore for PostgresStore {
    #[instrument(skip(self))]
    async fn contains(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn.lock().await;

        let row: Option<i32> = excluded_channels::table
            .filter(excluded_channels::guild_id.eq(guild_id))
            .filter(excluded_channels::channel_id.eq(channel_id))
            .select(excluded_channels::id)
            .first(&mut *conn)
            .optional()
            .map_err(StoreError::from)?;

        Ok(row.is_some())
    }

    #[instrument(skip(self))]
    async fn insert(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn.lock().await;

        let inserted = diesel::insert_into(excluded_channels::table)
            .values(NewExcludedChannel {
                guild_id,
                channel_id,
            })
            .on_conflict((
                excluded_channels::guild_id,
                excluded_channels::channel_id,
            ))
            .do_nothing()
            .execute(&mut *conn)
            .map_err(StoreError::from)?;

        Ok(inserted > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn.lock().await;

        let deleted = diesel::delete(
            excluded_channels::table
                .filter(excluded_channels::guild_id.eq(guild_id))
                .filter(excluded_channels::channel_id.eq(channel_id)),
        )
        .execute(&mut *conn)
        .map_err(StoreError::from)?;

        Ok(deleted > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self, guild_id: i64) -> Result<Vec<i64>, StoreError> {
        let mut conn = self.conn.lock().await;

        excluded_channels::table
            .filter(excluded_channels::guild_id.eq(guild_id))
            .order(excluded_channels::channel_id.asc())
            .select(excluded_channels::channel_id)
            .load(&mut *conn)
            .map_err(StoreError::from)
    }
}
