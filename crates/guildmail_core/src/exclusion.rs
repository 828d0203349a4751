//! Per-guild channel exclusion filter.

use crate::store::ExclusionStore;
use guildmail_error::{ExclusionError, ExclusionErrorKind, StoreError};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Membership test and management over the per-guild excluded channel set.
///
/// Messages from excluded channels are dropped before persistence or
/// notification.
#[derive(Clone)]
pub struct ExclusionFilter {
    store: Arc<dyn ExclusionStore>,
}

impl ExclusionFilter {
    /// Create a filter over an exclusion store.
    pub fn new(store: Arc<dyn ExclusionStore>) -> Self {
        Self { store }
    }

    /// Whether the channel is excluded in the guild.
    #[instrument(skip(self))]
    pub async fn is_excluded(&self, guild_id: i64, channel_id: i64) -> Result<bool, StoreError> {
        self.store.contains(guild_id, channel_id).await
    }

    /// Add a channel to the guild's exclusion set.
    ///
    /// Idempotent: adding an already-present pair succeeds without
    /// duplicating state.
    #[instrument(skip(self))]
    pub async fn add(&self, guild_id: i64, channel_id: i64) -> Result<(), StoreError> {
        let inserted = self.store.insert(guild_id, channel_id).await?;
        if !inserted {
            debug!(guild_id, channel_id, "channel already excluded");
        }
        Ok(())
    }

    /// Remove a channel from the guild's exclusion set.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the pair is absent; state is unchanged.
    #[instrument(skip(self))]
    pub async fn remove(&self, guild_id: i64, channel_id: i64) -> Result<(), ExclusionError> {
        let removed = self.store.delete(guild_id, channel_id).await?;
        if !removed {
            return Err(ExclusionError::new(ExclusionErrorKind::NotFound {
                guild_id,
                channel_id,
            }));
        }
        Ok(())
    }

    /// All excluded channel ids for the guild.
    #[instrument(skip(self))]
    pub async fn list(&self, guild_id: i64) -> Result<Vec<i64>, StoreError> {
        self.store.list(guild_id).await
    }
}
