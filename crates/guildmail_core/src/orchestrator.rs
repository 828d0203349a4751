//! Orchestrates gating and delivery for each inbound message event.

use crate::cooldown::{CooldownGate, GuildLocks};
use crate::event::{MessageEvent, Notification};
use crate::exclusion::ExclusionFilter;
use crate::fanout::{DeliveryFanout, DeliveryReport};
use crate::store::{MessageStore, NewMessage};
use guildmail_error::GuildmailResult;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// What the orchestrator did with a message event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageDisposition {
    /// Author is a bot account; dropped without further processing.
    IgnoredBot,
    /// Channel is in the guild's exclusion set; dropped before persistence.
    IgnoredExcluded,
    /// Cooldown window still open; persisted but not delivered.
    RateLimited,
    /// No subscribers; persisted, nothing attempted, cooldown untouched.
    NoRecipients,
    /// Fan-out ran; cooldown recorded.
    Delivered(DeliveryReport),
}

/// Composes the exclusion filter, message log, cooldown gate, and delivery
/// fan-out on each inbound message event.
#[derive(Clone)]
pub struct NotificationOrchestrator {
    exclusions: ExclusionFilter,
    messages: Arc<dyn MessageStore>,
    gate: CooldownGate,
    fanout: DeliveryFanout,
    locks: GuildLocks,
}

impl NotificationOrchestrator {
    /// Wire the orchestrator to its collaborators.
    pub fn new(
        exclusions: ExclusionFilter,
        messages: Arc<dyn MessageStore>,
        gate: CooldownGate,
        fanout: DeliveryFanout,
    ) -> Self {
        Self {
            exclusions,
            messages,
            gate,
            fanout,
            locks: GuildLocks::new(),
        }
    }

    /// Process one inbound message event.
    ///
    /// Bot authors and excluded channels are dropped outright. The message
    /// is then appended to the log; a log failure is reported but does not
    /// block notification. The cooldown check, delivery, and send recording
    /// run under the guild's lock so two rapid events cannot both slip
    /// through one window. The cooldown advances whenever any recipient was
    /// attempted, even if every individual send failed.
    ///
    /// # Errors
    ///
    /// Only store failures on the gating path escape; the caller is expected
    /// to log them and keep serving events.
    #[instrument(skip(self, event), fields(message_id = event.id, guild_id = event.guild_id, channel_id = event.channel_id))]
    pub async fn on_message(&self, event: &MessageEvent) -> GuildmailResult<MessageDisposition> {
        if event.author_is_bot {
            return Ok(MessageDisposition::IgnoredBot);
        }

        if self
            .exclusions
            .is_excluded(event.guild_id, event.channel_id)
            .await?
        {
            debug!("channel excluded, dropping message");
            return Ok(MessageDisposition::IgnoredExcluded);
        }

        // Fire-and-forget relative to notification logic.
        if let Err(error) = self.messages.insert_message(&NewMessage::from(event)).await {
            warn!(%error, "failed to persist message, continuing with notification");
        }

        let _guard = self.locks.lock(event.guild_id).await;

        if !self.gate.can_send(event.guild_id).await? {
            debug!("cooldown active, skipping notification");
            return Ok(MessageDisposition::RateLimited);
        }

        let notification = Notification::for_event(event);
        let report = self.fanout.deliver(event.guild_id, &notification).await?;

        if !report.any_attempted() {
            return Ok(MessageDisposition::NoRecipients);
        }

        // Record the attempt even when individual recipients failed, so
        // transient transport failures cannot bypass the rate limit.
        if let Err(error) = self.gate.record_send(event.guild_id).await {
            error!(%error, "delivered but failed to record send");
            return Err(error.into());
        }

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "notification delivered"
        );
        Ok(MessageDisposition::Delivered(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualClock, MemoryStore, RecordingTransport, sample_event};
    use crate::{GuildModeService, SubscriberRegistry};

    struct Harness {
        store: Arc<MemoryStore>,
        transport: Arc<RecordingTransport>,
        clock: Arc<ManualClock>,
        orchestrator: NotificationOrchestrator,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let clock = Arc::new(ManualClock::new());

        let gate = CooldownGate::new(
            store.clone(),
            GuildModeService::new(store.clone()),
            clock.clone(),
        );
        let fanout = DeliveryFanout::new(
            SubscriberRegistry::new(store.clone()),
            transport.clone(),
            "bot@example.com",
        );
        let orchestrator = NotificationOrchestrator::new(
            ExclusionFilter::new(store.clone()),
            store.clone(),
            gate,
            fanout,
        );

        Harness {
            store,
            transport,
            clock,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn bot_messages_are_dropped_before_everything() {
        let h = harness();
        let mut event = sample_event(1, 1, 10);
        event.author_is_bot = true;

        let disposition = h.orchestrator.on_message(&event).await.unwrap();

        assert_eq!(disposition, MessageDisposition::IgnoredBot);
        assert_eq!(h.store.message_count(), 0);
        assert_eq!(h.transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn excluded_channel_reaches_neither_log_nor_fanout() {
        let h = harness();
        let registry = SubscriberRegistry::new(h.store.clone());
        registry.register(7, 1, "s1@example.com").await.unwrap();
        ExclusionFilter::new(h.store.clone()).add(1, 10).await.unwrap();

        let event = sample_event(1, 1, 10);
        let disposition = h.orchestrator.on_message(&event).await.unwrap();

        assert_eq!(disposition, MessageDisposition::IgnoredExcluded);
        assert_eq!(h.store.message_count(), 0);
        assert_eq!(h.transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn persistence_failure_does_not_block_notification() {
        let h = harness();
        let registry = SubscriberRegistry::new(h.store.clone());
        registry.register(7, 1, "s1@example.com").await.unwrap();
        h.store.fail_message_inserts();

        let event = sample_event(1, 1, 10);
        let disposition = h.orchestrator.on_message(&event).await.unwrap();

        assert!(matches!(disposition, MessageDisposition::Delivered(_)));
        assert_eq!(h.transport.sent_count(), 1);
    }

    // Scenario A: one subscriber, no prior send - first message delivers and
    // arms the cooldown, an immediate second is suppressed, a third after 61
    // simulated minutes delivers again.
    #[tokio::test]
    async fn cooldown_suppresses_until_window_elapses() {
        let h = harness();
        let registry = SubscriberRegistry::new(h.store.clone());
        registry.register(7, 1, "s1@example.com").await.unwrap();

        let m1 = sample_event(1, 1, 10);
        let d1 = h.orchestrator.on_message(&m1).await.unwrap();
        assert!(matches!(d1, MessageDisposition::Delivered(_)));
        assert_eq!(h.store.message_count(), 1);
        let armed_at = h.store.last_sent_at_sync(1).unwrap();

        let m2 = sample_event(2, 1, 10);
        let d2 = h.orchestrator.on_message(&m2).await.unwrap();
        assert_eq!(d2, MessageDisposition::RateLimited);
        assert_eq!(h.transport.sent_count(), 1);
        // suppressed send leaves the cooldown unchanged
        assert_eq!(h.store.last_sent_at_sync(1).unwrap(), armed_at);
        // but the message is still persisted
        assert_eq!(h.store.message_count(), 2);

        h.clock.advance_minutes(61);
        let m3 = sample_event(3, 1, 10);
        let d3 = h.orchestrator.on_message(&m3).await.unwrap();
        assert!(matches!(d3, MessageDisposition::Delivered(_)));
        assert_eq!(h.transport.sent_count(), 2);
        assert!(h.store.last_sent_at_sync(1).unwrap() > armed_at);
    }

    // Scenario B: development mode delivers both of two rapid messages.
    #[tokio::test]
    async fn dev_mode_delivers_without_suppression() {
        let h = harness();
        let registry = SubscriberRegistry::new(h.store.clone());
        registry.register(7, 2, "s2@example.com").await.unwrap();
        GuildModeService::new(h.store.clone())
            .set_dev_mode(2, true)
            .await
            .unwrap();

        let d1 = h.orchestrator.on_message(&sample_event(1, 2, 20)).await.unwrap();
        h.clock.advance_minutes(1);
        let d2 = h.orchestrator.on_message(&sample_event(2, 2, 20)).await.unwrap();

        assert!(matches!(d1, MessageDisposition::Delivered(_)));
        assert!(matches!(d2, MessageDisposition::Delivered(_)));
        assert_eq!(h.transport.sent_count(), 2);
    }

    // Scenario C: zero subscribers - nothing attempted, cooldown untouched,
    // the next message is still eligible.
    #[tokio::test]
    async fn empty_recipient_set_does_not_consume_the_window() {
        let h = harness();

        let d1 = h.orchestrator.on_message(&sample_event(1, 3, 30)).await.unwrap();
        assert_eq!(d1, MessageDisposition::NoRecipients);
        assert!(h.store.last_sent_at_sync(3).is_none());

        // a subscriber arriving a second later still gets the next message
        let registry = SubscriberRegistry::new(h.store.clone());
        registry.register(7, 3, "s3@example.com").await.unwrap();
        let d2 = h.orchestrator.on_message(&sample_event(2, 3, 30)).await.unwrap();
        assert!(matches!(d2, MessageDisposition::Delivered(_)));
    }

    #[tokio::test]
    async fn cooldown_advances_even_when_every_recipient_fails() {
        let h = harness();
        let registry = SubscriberRegistry::new(h.store.clone());
        registry.register(7, 1, "down@example.com").await.unwrap();
        h.transport.fail_for("down@example.com");

        let disposition = h.orchestrator.on_message(&sample_event(1, 1, 10)).await.unwrap();

        match disposition {
            MessageDisposition::Delivered(report) => {
                assert_eq!(report.succeeded, 0);
                assert_eq!(report.failed, vec!["down@example.com"]);
            }
            other => panic!("expected Delivered, got {other:?}"),
        }
        // the attempt armed the window, so a retry storm cannot bypass it
        assert!(h.store.last_sent_at_sync(1).is_some());
        let d2 = h.orchestrator.on_message(&sample_event(2, 1, 10)).await.unwrap();
        assert_eq!(d2, MessageDisposition::RateLimited);
    }

    #[tokio::test]
    async fn concurrent_events_for_one_guild_deliver_once() {
        let h = harness();
        let registry = SubscriberRegistry::new(h.store.clone());
        registry.register(7, 1, "s1@example.com").await.unwrap();
        h.transport.delay_sends(std::time::Duration::from_millis(20));

        let orchestrator = h.orchestrator.clone();
        let first = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.on_message(&sample_event(1, 1, 10)).await }
        });
        let second = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.on_message(&sample_event(2, 1, 10)).await }
        });

        let d1 = first.await.unwrap().unwrap();
        let d2 = second.await.unwrap().unwrap();

        let delivered = [&d1, &d2]
            .iter()
            .filter(|d| matches!(d, MessageDisposition::Delivered(_)))
            .count();
        assert_eq!(delivered, 1, "exactly one of two racing events may send");
        assert_eq!(h.transport.sent_count(), 1);
    }
}
