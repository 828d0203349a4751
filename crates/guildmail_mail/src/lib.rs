//! HTTP mail provider transport for guildmail.
//!
//! Implements the core `MailTransport` trait over a JSON mail-provider API
//! (SendGrid-style `POST /send` with bearer auth). Each send attempt is
//! bounded by a timeout; transient failures (timeouts, connection errors,
//! 5xx) are retried with exponential backoff and jitter, while provider
//! rejections (4xx) fail immediately.

#![forbid(unsafe_code)]

mod config;
mod http;

pub use config::MailerConfig;
pub use http::HttpMailer;
