//! guildmail_core: the notification gating and delivery engine.
//!
//! This crate decides, per guild, whether an inbound chat message should fan
//! out an email notification to the guild's registered subscribers, and
//! performs the fan-out. It owns no I/O of its own: persistence and mail
//! delivery are reached through the [`store`] traits and [`MailTransport`],
//! injected at construction so tests can substitute in-memory collaborators.
//!
//! # Architecture
//!
//! The engine composes small per-concern services:
//! - [`ExclusionFilter`] - per-guild channel exclusion set
//! - [`GuildModeService`] - per-guild development-mode flag
//! - [`CooldownGate`] - one-hour cooldown over the last send timestamp,
//!   bypassed by development mode
//! - [`SubscriberRegistry`] - (user, guild, email) subscriptions
//! - [`DeliveryFanout`] - one email per distinct subscriber address with
//!   per-recipient failure isolation
//! - [`NotificationOrchestrator`] - wires the above on each message event
//!
//! The command surface exposed to the platform adapter lives in [`command`]:
//! a registry of handlers returning structured replies, never user-facing
//! text.
//!
//! # Concurrency
//!
//! Two events for the same guild arriving back to back would otherwise both
//! observe an open cooldown window before either records a send. The
//! orchestrator closes this race by holding a per-guild async mutex
//! ([`GuildLocks`]) across the check-deliver-record sequence. Locks are
//! per-guild entries, so one guild's fan-out never blocks another's.

#![forbid(unsafe_code)]

mod clock;
pub mod command;
mod cooldown;
mod event;
mod exclusion;
mod fanout;
mod mode;
mod orchestrator;
pub mod store;
mod subscribers;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{Clock, SystemClock};
pub use command::{CommandHandler, CommandRegistry, CommandReply, CommandRequest};
pub use cooldown::{COOLDOWN_MINUTES, CooldownGate, GuildLocks};
pub use event::{MessageEvent, Notification};
pub use exclusion::ExclusionFilter;
pub use fanout::{DeliveryFanout, DeliveryReport};
pub use mode::GuildModeService;
pub use orchestrator::{MessageDisposition, NotificationOrchestrator};
pub use subscribers::SubscriberRegistry;
pub use transport::{MailTransport, OutboundEmail};
