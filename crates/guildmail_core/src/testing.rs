//! In-memory collaborators shared by the engine's unit tests.

use crate::clock::Clock;
use crate::event::MessageEvent;
use crate::store::{
    CooldownStore, ExclusionStore, GuildModeStore, MessageStore, NewMessage, SubscriberStore,
};
use crate::transport::{MailTransport, OutboundEmail};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use guildmail_error::{MailError, MailErrorKind, StoreError, StoreErrorKind};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// A message event with plausible display fields.
pub fn sample_event(id: i64, guild_id: i64, channel_id: i64) -> MessageEvent {
    MessageEvent {
        id,
        guild_id,
        guild_name: format!("guild-{guild_id}"),
        channel_id,
        channel_name: format!("channel-{channel_id}"),
        author_id: 7,
        author_tag: "someone#0001".to_string(),
        author_is_bot: false,
        content: format!("message {id}"),
        permalink_url: format!("https://chat.example/{guild_id}/{channel_id}/{id}"),
    }
}

/// In-memory implementation of every store trait.
#[derive(Default)]
pub struct MemoryStore {
    messages: Mutex<Vec<NewMessage>>,
    subscriptions: Mutex<Vec<(i64, i64, String)>>,
    cooldowns: Mutex<HashMap<i64, DateTime<Utc>>>,
    modes: Mutex<HashMap<i64, bool>>,
    exclusions: Mutex<Vec<(i64, i64)>>,
    message_inserts_fail: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    /// Make every subsequent message insert fail with a query error.
    pub fn fail_message_inserts(&self) {
        *self.message_inserts_fail.lock().unwrap() = true;
    }

    pub fn last_sent_at_sync(&self, guild_id: i64) -> Option<DateTime<Utc>> {
        self.cooldowns.lock().unwrap().get(&guild_id).copied()
    }

    pub fn set_dev_mode_sync(&self, guild_id: i64, dev_mode: bool) {
        self.modes.lock().unwrap().insert(guild_id, dev_mode);
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: &NewMessage) -> Result<(), StoreError> {
        if *self.message_inserts_fail.lock().unwrap() {
            return Err(StoreError::new(StoreErrorKind::Query(
                "injected failure".to_string(),
            )));
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[async_trait]
impl SubscriberStore for MemoryStore {
    async fn insert_subscription(
        &self,
        user_id: i64,
        guild_id: i64,
        email: &str,
    ) -> Result<bool, StoreError> {
        let mut rows = self.subscriptions.lock().unwrap();
        let exists = rows
            .iter()
            .any(|(u, g, e)| *u == user_id && *g == guild_id && e == email);
        if exists {
            return Ok(false);
        }
        rows.push((user_id, guild_id, email.to_string()));
        Ok(true)
    }

    async fn delete_subscriptions(
        &self,
        user_id: i64,
        guild_id: i64,
    ) -> Result<usize, StoreError> {
        let mut rows = self.subscriptions.lock().unwrap();
        let before = rows.len();
        rows.retain(|(u, g, _)| !(*u == user_id && *g == guild_id));
        Ok(before - rows.len())
    }

    async fn find_email(&self, user_id: i64, guild_id: i64) -> Result<Option<String>, StoreError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|(u, g, _)| *u == user_id && *g == guild_id)
            .map(|(_, _, e)| e.clone()))
    }

    async fn distinct_emails(&self, guild_id: i64) -> Result<Vec<String>, StoreError> {
        let mut seen = HashSet::new();
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, g, _)| *g == guild_id)
            .filter(|(_, _, e)| seen.insert(e.clone()))
            .map(|(_, _, e)| e.clone())
            .collect())
    }
}

#[async_trait]
impl CooldownStore for MemoryStore {
    async fn last_sent_at(&self, guild_id: i64) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.cooldowns.lock().unwrap().get(&guild_id).copied())
    }

    async fn upsert_last_sent_at(
        &self,
        guild_id: i64,
        sent_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.cooldowns.lock().unwrap().insert(guild_id, sent_at);
        Ok(())
    }
}

#[async_trait]
impl GuildModeStore for MemoryStore {
    async fn dev_mode(&self, guild_id: i64) -> Result<Option<bool>, StoreError> {
        Ok(self.modes.lock().unwrap().get(&guild_id).copied())
    }

    async fn upsert_dev_mode(&self, guild_id: i64, dev_mode: bool) -> Result<(), StoreError> {
        self.modes.lock().unwrap().insert(guild_id, dev_mode);
        Ok(())
    }
}

#[async_trait]
impl ExclusionStore for MemoryStore {
    async fn contains(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError> {
        Ok(self
            .exclusions
            .lock()
            .unwrap()
            .contains(&(guild_id, channel_id)))
    }

    async fn insert(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError> {
        let mut rows = self.exclusions.lock().unwrap();
        if rows.contains(&(guild_id, channel_id)) {
            return Ok(false);
        }
        rows.push((guild_id, channel_id));
        Ok(true)
    }

    async fn delete(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError> {
        let mut rows = self.exclusions.lock().unwrap();
        let before = rows.len();
        rows.retain(|pair| *pair != (guild_id, channel_id));
        Ok(rows.len() < before)
    }

    async fn list(&self, guild_id: i64) -> Result<Vec<i64>, StoreError> {
        Ok(self
            .exclusions
            .lock()
            .unwrap()
            .iter()
            .filter(|(g, _)| *g == guild_id)
            .map(|(_, c)| *c)
            .collect())
    }
}

/// Transport double that records every send and can fail per recipient.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundEmail>>,
    failing: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, email: &str) {
        self.failing.lock().unwrap().insert(email.to_string());
    }

    /// Make each send pause, widening race windows in concurrency tests.
    pub fn delay_sends(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|email| email.to.clone())
            .collect()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&email.to) {
            return Err(MailError::new(MailErrorKind::Transport(
                "injected failure".to_string(),
            )));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Clock advanced by hand in tests.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.lock().unwrap();
        *now += TimeDelta::minutes(minutes);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
