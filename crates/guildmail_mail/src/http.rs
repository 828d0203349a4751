//! HTTP JSON mail transport.

use crate::MailerConfig;
use async_trait::async_trait;
use guildmail_core::{MailTransport, OutboundEmail};
use guildmail_error::{MailError, MailErrorKind};
use serde::Serialize;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// JSON payload for the provider's send endpoint.
#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Mail transport over a JSON provider API.
///
/// One `POST` per recipient with bearer auth. Transient failures are
/// retried with exponential backoff and jitter; 4xx responses are treated
/// as permanent rejections and fail immediately.
#[derive(Debug)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
    max_retries: usize,
    backoff_ms: u64,
}

impl HttpMailer {
    /// Create a mailer from configuration and the provider API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the endpoint is empty or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &MailerConfig, api_key: impl Into<String>) -> Result<Self, MailError> {
        if config.endpoint.is_empty() {
            return Err(MailError::new(MailErrorKind::Configuration(
                "mail endpoint is empty".to_string(),
            )));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| MailError::new(MailErrorKind::Configuration(e.to_string())))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            backoff_ms: config.backoff_ms,
        })
    }

    /// One delivery attempt, bounded by the configured deadline.
    async fn attempt(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let payload = SendPayload {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.body,
        };

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| MailError::new(MailErrorKind::Timeout(self.timeout.as_secs())))?
            .map_err(|e| MailError::new(MailErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            Err(MailError::new(MailErrorKind::Rejected(format!(
                "{status}: {detail}"
            ))))
        } else {
            Err(MailError::new(MailErrorKind::Transport(format!(
                "provider returned {status}: {detail}"
            ))))
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailer {
    #[instrument(skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let retry_strategy = ExponentialBackoff::from_millis(self.backoff_ms)
            .factor(2)
            .max_delay(Duration::from_secs(30))
            .map(jitter)
            .take(self.max_retries);

        Retry::spawn(retry_strategy, || async {
            match self.attempt(email).await {
                Ok(()) => Ok(()),
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "transient mail failure, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "permanent mail failure");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await?;

        debug!("mail accepted by provider");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> MailerConfig {
        MailerConfig {
            endpoint: endpoint.to_string(),
            from_address: "bot@example.com".to_string(),
            timeout_secs: 1,
            max_retries: 0,
            backoff_ms: 1,
        }
    }

    #[test]
    fn empty_endpoint_is_a_configuration_error() {
        let err = HttpMailer::new(&config(""), "key").unwrap_err();
        assert!(matches!(err.kind, MailErrorKind::Configuration(_)));
    }

    #[test]
    fn payload_serializes_provider_fields() {
        let payload = SendPayload {
            from: "bot@example.com",
            to: "user@example.com",
            subject: "hello",
            text: "body",
        };
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["from"], "bot@example.com");
        assert_eq!(json["to"], "user@example.com");
        assert_eq!(json["subject"], "hello");
        assert_eq!(json["text"], "body");
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_as_transport_error() {
        // port 9 (discard) is not listening in the test environment
        let mailer = HttpMailer::new(&config("http://127.0.0.1:9/send"), "key").unwrap();
        let email = OutboundEmail {
            from: "bot@example.com".to_string(),
            to: "user@example.com".to_string(),
            subject: "hello".to_string(),
            body: "body".to_string(),
        };

        let err = mailer.send(&email).await.unwrap_err();
        assert!(err.is_transient());
    }
}
