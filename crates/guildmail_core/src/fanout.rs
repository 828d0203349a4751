//! Delivery fan-out to every distinct subscriber email of a guild.

use crate::event::Notification;
use crate::subscribers::SubscriberRegistry;
use crate::transport::{MailTransport, OutboundEmail};
use guildmail_error::StoreError;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Outcome of one fan-out attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliveryReport {
    /// Recipients a send was attempted for.
    pub attempted: usize,
    /// Recipients the transport accepted.
    pub succeeded: usize,
    /// Emails the transport rejected or timed out on.
    pub failed: Vec<String>,
}

impl DeliveryReport {
    /// Whether any recipient was attempted.
    pub fn any_attempted(&self) -> bool {
        self.attempted > 0
    }
}

/// Sends one notification to every distinct subscriber email of a guild.
#[derive(Clone)]
pub struct DeliveryFanout {
    subscribers: SubscriberRegistry,
    transport: Arc<dyn MailTransport>,
    from_address: String,
}

impl DeliveryFanout {
    /// Create a fan-out over the subscriber registry and a transport.
    pub fn new(
        subscribers: SubscriberRegistry,
        transport: Arc<dyn MailTransport>,
        from_address: impl Into<String>,
    ) -> Self {
        Self {
            subscribers,
            transport,
            from_address: from_address.into(),
        }
    }

    /// Deliver the notification to every subscriber of the guild.
    ///
    /// An empty recipient set returns immediately with nothing attempted, so
    /// the caller does not consume the cooldown window. A failure for one
    /// recipient never prevents attempts to the rest; failed emails are
    /// collected in the report.
    ///
    /// # Errors
    ///
    /// Only a store failure resolving the recipient list aborts the fan-out.
    #[instrument(skip(self, notification), fields(guild_id))]
    pub async fn deliver(
        &self,
        guild_id: i64,
        notification: &Notification,
    ) -> Result<DeliveryReport, StoreError> {
        let emails = self.subscribers.list_emails(guild_id).await?;
        if emails.is_empty() {
            debug!(guild_id, "no subscribers, nothing to deliver");
            return Ok(DeliveryReport::default());
        }

        let mut report = DeliveryReport::default();
        for email in emails {
            report.attempted += 1;
            let outbound = OutboundEmail {
                from: self.from_address.clone(),
                to: email.clone(),
                subject: notification.subject.clone(),
                body: notification.body.clone(),
            };
            match self.transport.send(&outbound).await {
                Ok(()) => report.succeeded += 1,
                Err(error) => {
                    warn!(guild_id, %error, "delivery failed for one recipient");
                    report.failed.push(email);
                }
            }
        }

        debug!(
            guild_id,
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "fan-out complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, RecordingTransport, sample_event};

    fn fanout(store: &Arc<MemoryStore>, transport: &Arc<RecordingTransport>) -> DeliveryFanout {
        DeliveryFanout::new(
            SubscriberRegistry::new(store.clone()),
            transport.clone(),
            "bot@example.com",
        )
    }

    #[tokio::test]
    async fn empty_recipient_set_attempts_nothing() {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let fanout = fanout(&store, &transport);

        let notification = Notification::for_event(&sample_event(1, 1, 10));
        let report = fanout.deliver(1, &notification).await.unwrap();

        assert!(!report.any_attempted());
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn delivers_to_each_distinct_email() {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let fanout = fanout(&store, &transport);
        let registry = SubscriberRegistry::new(store.clone());
        registry.register(1, 1, "a@example.com").await.unwrap();
        registry.register(2, 1, "b@example.com").await.unwrap();

        let notification = Notification::for_event(&sample_event(1, 1, 10));
        let report = fanout.deliver(1, &notification).await.unwrap();

        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 2);
        assert!(report.failed.is_empty());

        let mut recipients = transport.recipients();
        recipients.sort();
        assert_eq!(recipients, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_rest() {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::new());
        transport.fail_for("broken@example.com");
        let fanout = fanout(&store, &transport);
        let registry = SubscriberRegistry::new(store.clone());
        registry.register(1, 1, "broken@example.com").await.unwrap();
        registry.register(2, 1, "ok@example.com").await.unwrap();

        let notification = Notification::for_event(&sample_event(1, 1, 10));
        let report = fanout.deliver(1, &notification).await.unwrap();

        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, vec!["broken@example.com"]);
        assert!(transport.recipients().contains(&"ok@example.com".to_string()));
    }

    #[tokio::test]
    async fn sender_and_subject_come_from_configuration_and_event() {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let fanout = fanout(&store, &transport);
        let registry = SubscriberRegistry::new(store.clone());
        registry.register(1, 1, "a@example.com").await.unwrap();

        let event = sample_event(1, 1, 10);
        let notification = Notification::for_event(&event);
        fanout.deliver(1, &notification).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "bot@example.com");
        assert!(sent[0].subject.contains(&event.guild_name));
    }
}
