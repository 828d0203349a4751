//! Handlers for the command surface, one per slash command.

use super::{CommandHandler, CommandRegistry, CommandReply, CommandRequest};
use crate::exclusion::ExclusionFilter;
use crate::mode::GuildModeService;
use crate::subscribers::SubscriberRegistry;
use crate::transport::{MailTransport, OutboundEmail};
use async_trait::async_trait;
use guildmail_error::{ExclusionErrorKind, GuildmailResult, SubscriptionErrorKind};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Build the registry with every standard handler wired to its
/// collaborators.
pub fn standard_registry(
    subscribers: SubscriberRegistry,
    modes: GuildModeService,
    exclusions: ExclusionFilter,
    transport: Arc<dyn MailTransport>,
    from_address: impl Into<String>,
) -> CommandRegistry {
    let from_address = from_address.into();
    let mut registry = CommandRegistry::new();
    registry
        .register(PingCommand)
        .register(RegisterCommand {
            subscribers: subscribers.clone(),
            transport,
            from_address,
        })
        .register(CancelCommand {
            subscribers: subscribers.clone(),
        })
        .register(CheckCommand { subscribers })
        .register(ModeCommand { modes })
        .register(ExclusionCommand { exclusions });
    registry
}

/// Liveness probe.
pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    fn name(&self) -> &'static str {
        "ping"
    }

    async fn execute(&self, _request: &CommandRequest) -> GuildmailResult<CommandReply> {
        Ok(CommandReply::Pong)
    }
}

/// Register an email for notifications in the invoking guild.
///
/// A successful registration triggers a confirmation email; a confirmation
/// that bounces is logged and does not undo the registration.
pub struct RegisterCommand {
    pub(super) subscribers: SubscriberRegistry,
    pub(super) transport: Arc<dyn MailTransport>,
    pub(super) from_address: String,
}

impl RegisterCommand {
    fn confirmation(&self, to: &str, guild_name: &str) -> OutboundEmail {
        OutboundEmail {
            from: self.from_address.clone(),
            to: to.to_string(),
            subject: "Notification registration confirmed".to_string(),
            body: format!(
                "Email notifications are now active.\n\
                 Server: {guild_name}\n\
                 New messages will be delivered to this address at most once per hour.\n\
                 Run /cancel in the server to stop receiving them.\n\
                 If you did not request this, please reply to this email.\n"
            ),
        }
    }
}

#[async_trait]
impl CommandHandler for RegisterCommand {
    fn name(&self) -> &'static str {
        "register"
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id, guild_id = request.guild_id))]
    async fn execute(&self, request: &CommandRequest) -> GuildmailResult<CommandReply> {
        let Some(email) = request.str_arg("email") else {
            return Ok(CommandReply::Invalid {
                reason: "missing argument: email".to_string(),
            });
        };

        match self
            .subscribers
            .register(request.user_id, request.guild_id, email)
            .await
        {
            Ok(()) => {
                let confirmation = self.confirmation(email, &request.guild_name);
                if let Err(error) = self.transport.send(&confirmation).await {
                    warn!(%error, "confirmation email failed, registration stands");
                }
                Ok(CommandReply::Registered {
                    email: email.to_string(),
                })
            }
            Err(error) => match &error.kind {
                SubscriptionErrorKind::InvalidEmail(email) => Ok(CommandReply::InvalidEmail {
                    email: email.clone(),
                }),
                SubscriptionErrorKind::Duplicate { email, .. } => {
                    Ok(CommandReply::AlreadyRegistered {
                        email: email.clone(),
                    })
                }
                SubscriptionErrorKind::Store(_) => Err(error.into()),
            },
        }
    }
}

/// Remove every subscription the invoker holds in the guild.
pub struct CancelCommand {
    pub(super) subscribers: SubscriberRegistry,
}

#[async_trait]
impl CommandHandler for CancelCommand {
    fn name(&self) -> &'static str {
        "cancel"
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id, guild_id = request.guild_id))]
    async fn execute(&self, request: &CommandRequest) -> GuildmailResult<CommandReply> {
        let removed = self
            .subscribers
            .unregister(request.user_id, request.guild_id)
            .await?;
        Ok(CommandReply::Cancelled { removed })
    }
}

/// Report the invoker's registration status in the guild.
pub struct CheckCommand {
    pub(super) subscribers: SubscriberRegistry,
}

#[async_trait]
impl CommandHandler for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id, guild_id = request.guild_id))]
    async fn execute(&self, request: &CommandRequest) -> GuildmailResult<CommandReply> {
        let email = self
            .subscribers
            .status_for(request.user_id, request.guild_id)
            .await?;
        Ok(CommandReply::Status { email })
    }
}

/// Switch the guild between production and development mode.
///
/// Administrator-only; the adapter resolves the invoker's permissions.
pub struct ModeCommand {
    pub(super) modes: GuildModeService,
}

#[async_trait]
impl CommandHandler for ModeCommand {
    fn name(&self) -> &'static str {
        "mode"
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id, guild_id = request.guild_id))]
    async fn execute(&self, request: &CommandRequest) -> GuildmailResult<CommandReply> {
        if !request.is_admin {
            return Ok(CommandReply::Denied {
                reason: "administrator permissions required".to_string(),
            });
        }

        let dev_mode = match request.str_arg("mode") {
            Some("dev") | Some("development") => true,
            Some("prod") | Some("production") => false,
            Some(other) => {
                return Ok(CommandReply::Invalid {
                    reason: format!("unknown mode: {other}"),
                });
            }
            None => {
                return Ok(CommandReply::Invalid {
                    reason: "missing argument: mode".to_string(),
                });
            }
        };

        self.modes.set_dev_mode(request.guild_id, dev_mode).await?;
        Ok(CommandReply::ModeSet { dev_mode })
    }
}

/// Manage the guild's excluded-channel set.
pub struct ExclusionCommand {
    pub(super) exclusions: ExclusionFilter,
}

#[async_trait]
impl CommandHandler for ExclusionCommand {
    fn name(&self) -> &'static str {
        "exclusion"
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id, guild_id = request.guild_id))]
    async fn execute(&self, request: &CommandRequest) -> GuildmailResult<CommandReply> {
        let action = request.str_arg("action").unwrap_or_default().to_string();

        match action.as_str() {
            "list" => {
                let channel_ids = self.exclusions.list(request.guild_id).await?;
                Ok(CommandReply::ExclusionList { channel_ids })
            }
            "add" | "remove" => {
                let Some(channel_id) = request.i64_arg("channel") else {
                    return Ok(CommandReply::Invalid {
                        reason: format!("missing argument: channel (required for {action})"),
                    });
                };
                if action == "add" {
                    self.exclusions.add(request.guild_id, channel_id).await?;
                    Ok(CommandReply::ExclusionAdded { channel_id })
                } else {
                    match self.exclusions.remove(request.guild_id, channel_id).await {
                        Ok(()) => Ok(CommandReply::ExclusionRemoved { channel_id }),
                        Err(error) => match &error.kind {
                            ExclusionErrorKind::NotFound { channel_id, .. } => {
                                Ok(CommandReply::ExclusionMissing {
                                    channel_id: *channel_id,
                                })
                            }
                            ExclusionErrorKind::Store(_) => Err(error.into()),
                        },
                    }
                }
            }
            other => Ok(CommandReply::Invalid {
                reason: format!("unknown action: {other}"),
            }),
        }
    }
}
