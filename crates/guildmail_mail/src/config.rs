//! Mailer configuration.

use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> usize {
    3
}

fn default_backoff_ms() -> u64 {
    500
}

/// Configuration for the HTTP mail transport.
///
/// The provider API key is deliberately absent: it is a secret and is read
/// from the `MAIL_API_KEY` environment variable at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    /// Provider send endpoint, e.g. `https://api.mailprovider.example/v3/send`.
    pub endpoint: String,
    /// Sender address for every outbound email.
    pub from_address: String,
    /// Per-attempt deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after the first attempt for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Initial backoff in milliseconds; doubles per retry with jitter.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}
