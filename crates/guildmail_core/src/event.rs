//! Inbound message events and the notification built from them.

/// A chat message event as delivered by the platform adapter.
///
/// Display fields (guild name, channel name, author tag, permalink) are
/// resolved by the platform before the event reaches the engine; the engine
/// never calls back into the platform to compute them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Platform message id (snowflake).
    pub id: i64,
    /// Guild the message was posted in.
    pub guild_id: i64,
    /// Guild display name.
    pub guild_name: String,
    /// Channel the message was posted in.
    pub channel_id: i64,
    /// Channel display name.
    pub channel_name: String,
    /// Message author.
    pub author_id: i64,
    /// Author display tag.
    pub author_tag: String,
    /// Whether the author is a bot account.
    pub author_is_bot: bool,
    /// Message text.
    pub content: String,
    /// Link back to the message.
    pub permalink_url: String,
}

/// The rendered notification sent to every subscriber of a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Email subject line.
    pub subject: String,
    /// Email body text.
    pub body: String,
}

impl Notification {
    /// Render the notification for a message event.
    pub fn for_event(event: &MessageEvent) -> Self {
        let subject = format!("New message in {}", event.guild_name);
        let body = format!(
            "New message:\n\
             Server: {}\n\
             Channel: {}\n\
             Author: {}\n\
             Content: {}\n\
             URL: {}\n",
            event.guild_name,
            event.channel_name,
            event.author_tag,
            event.content,
            event.permalink_url,
        );
        Self { subject, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_event;

    #[test]
    fn notification_carries_event_fields() {
        let event = sample_event(1, 10, 100);
        let notification = Notification::for_event(&event);

        assert!(notification.subject.contains(&event.guild_name));
        assert!(notification.body.contains(&event.channel_name));
        assert!(notification.body.contains(&event.author_tag));
        assert!(notification.body.contains(&event.content));
        assert!(notification.body.contains(&event.permalink_url));
    }
}
