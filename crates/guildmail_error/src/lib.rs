//! Error types for the guildmail notification engine.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use guildmail_error::{GuildmailResult, StoreError, StoreErrorKind};
//!
//! fn load_row() -> GuildmailResult<String> {
//!     Err(StoreError::new(StoreErrorKind::NotFound))?
//! }
//!
//! match load_row() {
//!     Ok(row) => println!("Got: {}", row),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod exclusion;
mod mail;
mod store;
mod subscription;

pub use config::ConfigError;
pub use error::{GuildmailError, GuildmailErrorKind, GuildmailResult};
pub use exclusion::{ExclusionError, ExclusionErrorKind};
pub use mail::{MailError, MailErrorKind};
pub use store::{StoreError, StoreErrorKind};
pub use subscription::{SubscriptionError, SubscriptionErrorKind};
