//! Per-guild development-mode flag.

use crate::store::GuildModeStore;
use guildmail_error::StoreError;
use std::sync::Arc;
use tracing::{info, instrument};

/// Read/write access to the per-guild development-mode flag.
///
/// Development mode disables the notification cooldown for a guild so
/// operators can exercise delivery without waiting out the window.
#[derive(Clone)]
pub struct GuildModeService {
    store: Arc<dyn GuildModeStore>,
}

impl GuildModeService {
    /// Create a service over a guild-mode store.
    pub fn new(store: Arc<dyn GuildModeStore>) -> Self {
        Self { store }
    }

    /// The guild's development-mode flag, defaulting to `false` when no row
    /// exists.
    #[instrument(skip(self))]
    pub async fn dev_mode(&self, guild_id: i64) -> Result<bool, StoreError> {
        Ok(self.store.dev_mode(guild_id).await?.unwrap_or(false))
    }

    /// Upsert the guild's development-mode flag.
    #[instrument(skip(self))]
    pub async fn set_dev_mode(&self, guild_id: i64, dev_mode: bool) -> Result<(), StoreError> {
        self.store.upsert_dev_mode(guild_id, dev_mode).await?;
        info!(guild_id, dev_mode, "guild mode updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[tokio::test]
    async fn defaults_to_production() {
        let store = Arc::new(MemoryStore::new());
        let modes = GuildModeService::new(store);

        assert!(!modes.dev_mode(1).await.unwrap());
    }

    #[tokio::test]
    async fn set_mode_round_trips_and_upserts() {
        let store = Arc::new(MemoryStore::new());
        let modes = GuildModeService::new(store);

        modes.set_dev_mode(1, true).await.unwrap();
        assert!(modes.dev_mode(1).await.unwrap());

        modes.set_dev_mode(1, false).await.unwrap();
        assert!(!modes.dev_mode(1).await.unwrap());
    }
}
