//! guildmail: Discord-to-email notification bot.
//!
//! Watches guild messages and fans out an email to each registered
//! subscriber, at most once per guild per hour unless the guild is in
//! development mode. The gating and delivery engine lives in
//! `guildmail_core`; this crate supplies the Discord adapter (gateway
//! client, event handler, slash-command surface), configuration loading,
//! and the binary entry point.

#![forbid(unsafe_code)]

mod cli;
mod config;
pub mod discord;

pub use cli::{Cli, Commands};
pub use config::{DiscordConfig, GuildmailConfig};
pub use discord::GuildmailBot;
