//! Discord adapter: gateway client, event handler, slash-command surface.
//!
//! The adapter converts Serenity events into the engine's types and renders
//! structured command replies back into interaction responses. No gating or
//! delivery decisions are made here.

mod client;
mod commands;
mod handler;

pub use client::GuildmailBot;
pub use commands::{command_definitions, help_text, render_reply};
pub use handler::GuildmailHandler;
