//! Command execution infrastructure.
//!
//! The platform adapter converts a slash-command interaction into a
//! [`CommandRequest`] and dispatches it through the [`CommandRegistry`];
//! each handler returns a structured [`CommandReply`] for the adapter to
//! render. Core produces no user-facing text, and the registry replaces any
//! per-platform if/else dispatch cascade.

mod handlers;

pub use handlers::{
    CancelCommand, CheckCommand, ExclusionCommand, ModeCommand, PingCommand, RegisterCommand,
    standard_registry,
};

use async_trait::async_trait;
use guildmail_error::GuildmailResult;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A command invocation as seen by the engine.
///
/// Authorization is the platform's concern: `is_admin` reflects the
/// invoker's permissions as resolved by the adapter.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    /// Invoking user.
    pub user_id: i64,
    /// Guild the command was invoked in.
    pub guild_id: i64,
    /// Guild display name, for replies and confirmation mail.
    pub guild_name: String,
    /// Whether the invoker holds administrator permissions.
    pub is_admin: bool,
    /// Raw command options.
    pub args: HashMap<String, JsonValue>,
}

impl CommandRequest {
    /// A string argument, if present.
    pub fn str_arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(JsonValue::as_str)
    }

    /// An integer argument, accepting either a JSON number or a numeric
    /// string (platform ids arrive as strings to avoid precision loss).
    pub fn i64_arg(&self, name: &str) -> Option<i64> {
        let value = self.args.get(name)?;
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
    }
}

/// Structured command outcome for the platform adapter to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandReply {
    /// Liveness probe response.
    Pong,
    /// Subscription created.
    Registered {
        /// Registered address
        email: String,
    },
    /// The exact triple was already registered.
    AlreadyRegistered {
        /// Address already on file
        email: String,
    },
    /// The address failed the syntactic check.
    InvalidEmail {
        /// Rejected address
        email: String,
    },
    /// Subscriptions removed for the invoker.
    Cancelled {
        /// Number of rows removed
        removed: usize,
    },
    /// Current registration status for the invoker.
    Status {
        /// One registered address, if any
        email: Option<String>,
    },
    /// Guild mode updated.
    ModeSet {
        /// New development-mode flag
        dev_mode: bool,
    },
    /// Channel added to the exclusion set.
    ExclusionAdded {
        /// Excluded channel
        channel_id: i64,
    },
    /// Channel removed from the exclusion set.
    ExclusionRemoved {
        /// No-longer-excluded channel
        channel_id: i64,
    },
    /// Removal target was not in the exclusion set.
    ExclusionMissing {
        /// Channel that was not found
        channel_id: i64,
    },
    /// Current exclusion set.
    ExclusionList {
        /// Excluded channels
        channel_ids: Vec<i64>,
    },
    /// Invoker lacks the required permissions.
    Denied {
        /// Why the command was refused
        reason: String,
    },
    /// Malformed invocation (missing or unparseable argument, unknown
    /// command or action).
    Invalid {
        /// What was wrong
        reason: String,
    },
}

/// Executes one named command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// The command identifier this handler answers to.
    fn name(&self) -> &'static str;

    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Only store failures propagate; domain outcomes (validation,
    /// duplicates, missing exclusions, denial) are `Ok` reply variants.
    async fn execute(&self, request: &CommandRequest) -> GuildmailResult<CommandReply>;
}

/// Registry of command handlers keyed by command name.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name.
    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) -> &mut Self {
        let name = handler.name();
        info!(command = name, "registering command handler");
        self.handlers.insert(name, Arc::new(handler));
        self
    }

    /// Names of every registered command.
    pub fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch a request to the named handler.
    #[instrument(skip(self, request), fields(user_id = request.user_id, guild_id = request.guild_id))]
    pub async fn dispatch(
        &self,
        name: &str,
        request: &CommandRequest,
    ) -> GuildmailResult<CommandReply> {
        match self.handlers.get(name) {
            Some(handler) => handler.execute(request).await,
            None => {
                warn!(command = name, "unknown command");
                Ok(CommandReply::Invalid {
                    reason: format!("unknown command: {name}"),
                })
            }
        }
    }
}
