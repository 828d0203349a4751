//! Per-guild, per-user email subscriptions.

use crate::store::SubscriberStore;
use guildmail_error::{StoreError, SubscriptionError, SubscriptionErrorKind};
use std::sync::Arc;
use tracing::{info, instrument};

/// Registration and lookup over (user, guild, email) subscription triples.
#[derive(Clone)]
pub struct SubscriberRegistry {
    store: Arc<dyn SubscriberStore>,
}

impl SubscriberRegistry {
    /// Create a registry over a subscriber store.
    pub fn new(store: Arc<dyn SubscriberStore>) -> Self {
        Self { store }
    }

    /// Register an email for the user in the guild.
    ///
    /// The email check is deliberately loose: any address containing `@` is
    /// accepted, since existing subscribers may hold non-RFC-strict
    /// addresses. On success the caller is expected to trigger a
    /// confirmation delivery; the registry itself sends nothing.
    ///
    /// # Errors
    ///
    /// - `InvalidEmail` when the address lacks an `@`
    /// - `Duplicate` when the exact triple is already registered
    #[instrument(skip(self, email))]
    pub async fn register(
        &self,
        user_id: i64,
        guild_id: i64,
        email: &str,
    ) -> Result<(), SubscriptionError> {
        if !email.contains('@') {
            return Err(SubscriptionError::new(SubscriptionErrorKind::InvalidEmail(
                email.to_string(),
            )));
        }

        let inserted = self.store.insert_subscription(user_id, guild_id, email).await?;
        if !inserted {
            return Err(SubscriptionError::new(SubscriptionErrorKind::Duplicate {
                guild_id,
                email: email.to_string(),
            }));
        }

        info!(user_id, guild_id, "subscription registered");
        Ok(())
    }

    /// Remove every subscription the user holds in the guild, returning the
    /// number of rows removed. Removing nothing is a successful no-op.
    #[instrument(skip(self))]
    pub async fn unregister(&self, user_id: i64, guild_id: i64) -> Result<usize, StoreError> {
        let removed = self.store.delete_subscriptions(user_id, guild_id).await?;
        info!(user_id, guild_id, removed, "subscriptions removed");
        Ok(removed)
    }

    /// One email the user has registered in the guild, if any. Which of
    /// several is returned is unspecified.
    #[instrument(skip(self))]
    pub async fn status_for(
        &self,
        user_id: i64,
        guild_id: i64,
    ) -> Result<Option<String>, StoreError> {
        self.store.find_email(user_id, guild_id).await
    }

    /// All distinct subscriber emails for the guild.
    #[instrument(skip(self))]
    pub async fn list_emails(&self, guild_id: i64) -> Result<Vec<String>, StoreError> {
        self.store.distinct_emails(guild_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[tokio::test]
    async fn rejects_email_without_at_sign() {
        let registry = SubscriberRegistry::new(Arc::new(MemoryStore::new()));

        let err = registry.register(1, 1, "not-an-email").await.unwrap_err();
        assert!(matches!(err.kind, SubscriptionErrorKind::InvalidEmail(_)));
    }

    #[tokio::test]
    async fn duplicate_triple_fails_second_time() {
        let registry = SubscriberRegistry::new(Arc::new(MemoryStore::new()));

        registry.register(1, 1, "a@example.com").await.unwrap();
        let err = registry.register(1, 1, "a@example.com").await.unwrap_err();
        assert!(matches!(err.kind, SubscriptionErrorKind::Duplicate { .. }));
    }

    #[tokio::test]
    async fn user_may_hold_multiple_emails_per_guild() {
        let registry = SubscriberRegistry::new(Arc::new(MemoryStore::new()));

        registry.register(1, 1, "a@example.com").await.unwrap();
        registry.register(1, 1, "b@example.com").await.unwrap();

        let mut emails = registry.list_emails(1).await.unwrap();
        emails.sort();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn unregister_removes_all_rows_for_user() {
        let registry = SubscriberRegistry::new(Arc::new(MemoryStore::new()));

        registry.register(1, 1, "a@example.com").await.unwrap();
        registry.register(1, 1, "b@example.com").await.unwrap();
        registry.register(2, 1, "c@example.com").await.unwrap();

        assert_eq!(registry.unregister(1, 1).await.unwrap(), 2);
        assert_eq!(registry.status_for(1, 1).await.unwrap(), None);
        // other users' rows survive
        assert_eq!(
            registry.status_for(2, 1).await.unwrap(),
            Some("c@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn unregister_with_no_rows_is_a_no_op() {
        let registry = SubscriberRegistry::new(Arc::new(MemoryStore::new()));

        assert_eq!(registry.unregister(1, 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_emails_deduplicates_across_users() {
        let registry = SubscriberRegistry::new(Arc::new(MemoryStore::new()));

        registry.register(1, 1, "shared@example.com").await.unwrap();
        registry.register(2, 1, "shared@example.com").await.unwrap();

        assert_eq!(
            registry.list_emails(1).await.unwrap(),
            vec!["shared@example.com"]
        );
    }
}
