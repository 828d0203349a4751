//! Per-guild notification cooldown.

use crate::clock::Clock;
use crate::mode::GuildModeService;
use crate::store::CooldownStore;
use chrono::TimeDelta;
use guildmail_error::StoreError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};

/// Length of the cooldown window in minutes.
pub const COOLDOWN_MINUTES: i64 = 60;

/// Gate over the per-guild last-send timestamp.
///
/// A guild may send once per window; the boundary is inclusive, so a check
/// exactly one window after the last send is allowed. Development mode
/// bypasses the window entirely.
#[derive(Clone)]
pub struct CooldownGate {
    cooldowns: Arc<dyn CooldownStore>,
    modes: GuildModeService,
    clock: Arc<dyn Clock>,
}

impl CooldownGate {
    /// Create a gate over a cooldown store, guild modes, and a clock.
    pub fn new(
        cooldowns: Arc<dyn CooldownStore>,
        modes: GuildModeService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cooldowns,
            modes,
            clock,
        }
    }

    /// Whether the guild may send a notification now.
    ///
    /// True when the guild is in development mode, has never sent, or the
    /// last send is at least one window in the past.
    #[instrument(skip(self))]
    pub async fn can_send(&self, guild_id: i64) -> Result<bool, StoreError> {
        if self.modes.dev_mode(guild_id).await? {
            debug!(guild_id, "development mode, cooldown bypassed");
            return Ok(true);
        }

        match self.cooldowns.last_sent_at(guild_id).await? {
            None => Ok(true),
            Some(last_sent_at) => {
                let elapsed = self.clock.now() - last_sent_at;
                Ok(elapsed >= TimeDelta::minutes(COOLDOWN_MINUTES))
            }
        }
    }

    /// Record a send attempt, unconditionally overwriting the guild's last
    /// send timestamp with the current time.
    #[instrument(skip(self))]
    pub async fn record_send(&self, guild_id: i64) -> Result<(), StoreError> {
        self.cooldowns
            .upsert_last_sent_at(guild_id, self.clock.now())
            .await
    }
}

/// Per-guild mutual exclusion for the check-deliver-record sequence.
///
/// Two events for the same guild arriving concurrently could both observe an
/// open window before either records a send; holding the guild's lock across
/// the sequence closes that race. The map guard is released before the guild
/// lock is awaited, so contention on one guild never blocks another.
#[derive(Clone, Default)]
pub struct GuildLocks {
    locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl GuildLocks {
    /// Create an empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a guild, creating it on first use.
    pub async fn lock(&self, guild_id: i64) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(guild_id).or_default())
        };
        entry.lock_owned().await
    }
}
