//! Mail transport contract.

use async_trait::async_trait;
use guildmail_error::MailError;

/// A single outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Delivers one email per call.
///
/// Implementations own their own timeout and retry policy; the engine treats
/// a returned error as final for that recipient.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver the email.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}
