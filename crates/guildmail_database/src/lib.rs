//! PostgreSQL persistence for guildmail.
//!
//! This crate provides the diesel schema, row models, connection helpers,
//! and [`PostgresStore`], the production implementation of the
//! `guildmail_core` store traits. The connection is wrapped in
//! `Arc<Mutex<PgConnection>>` for async access; writes to the same row are
//! serialized by the database's unique constraints and upsert statements.

#![forbid(unsafe_code)]

mod connection;
mod models;
pub mod schema;
mod store;

pub use connection::{establish_connection, run_migrations};
pub use models::{
    CooldownRow, ExcludedChannelRow, GuildModeRow, MessageRow, NewExcludedChannel, NewMessageRow,
    NewSubscription, SubscriptionRow,
};
pub use store::PostgresStore;
