//! Slash-command definitions, option conversion, and reply rendering.

use guildmail_core::CommandReply;
use serde_json::Value as JsonValue;
use serenity::all::{
    CommandDataOption, CommandDataOptionValue, CommandOptionType, CreateCommand,
    CreateCommandOption,
};
use std::collections::HashMap;

/// The application commands guildmail registers on startup.
pub fn command_definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("ping").description("Replies with pong"),
        CreateCommand::new("register")
            .description("Register an email for message notifications")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "email",
                    "Email address to receive notifications",
                )
                .required(true),
            ),
        CreateCommand::new("cancel").description("Cancel email notifications for this server"),
        CreateCommand::new("check")
            .description("Check your email notification registration status"),
        CreateCommand::new("mode")
            .description("Set server mode (administrators only)")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "mode", "Server mode")
                    .required(true)
                    .add_string_choice("production", "prod")
                    .add_string_choice("development", "dev"),
            ),
        CreateCommand::new("exclusion")
            .description("Manage channel exclusion settings")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "action", "Action to perform")
                    .required(true)
                    .add_string_choice("add", "add")
                    .add_string_choice("remove", "remove")
                    .add_string_choice("list", "list"),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::Channel, "channel", "Target channel")
                    .required(false),
            ),
        CreateCommand::new("help").description("Show all available commands"),
    ]
}

/// Convert interaction options into the engine's argument map.
///
/// Snowflake-valued options become strings so precision survives the JSON
/// round trip; the engine parses them back into ids.
pub(crate) fn option_values(options: &[CommandDataOption]) -> HashMap<String, JsonValue> {
    options
        .iter()
        .map(|option| {
            let value = match &option.value {
                CommandDataOptionValue::String(s) => JsonValue::from(s.clone()),
                CommandDataOptionValue::Integer(i) => JsonValue::from(*i),
                CommandDataOptionValue::Boolean(b) => JsonValue::from(*b),
                CommandDataOptionValue::Number(n) => JsonValue::from(*n),
                CommandDataOptionValue::Channel(id) => JsonValue::from(id.get().to_string()),
                CommandDataOptionValue::User(id) => JsonValue::from(id.get().to_string()),
                CommandDataOptionValue::Role(id) => JsonValue::from(id.get().to_string()),
                _ => JsonValue::Null,
            };
            (option.name.clone(), value)
        })
        .collect()
}

/// Render a structured command reply into interaction response text.
pub fn render_reply(reply: &CommandReply) -> String {
    match reply {
        CommandReply::Pong => "Pong!".to_string(),
        CommandReply::Registered { email } => format!(
            "Email notifications will be sent to {email}. A confirmation email is on its way."
        ),
        CommandReply::AlreadyRegistered { email } => {
            format!("{email} is already registered in this server.")
        }
        CommandReply::InvalidEmail { email } => {
            format!("{email} does not look like a valid email address.")
        }
        CommandReply::Cancelled { removed: 0 } => {
            "No email notifications were registered in this server.".to_string()
        }
        CommandReply::Cancelled { .. } => {
            "Email notifications cancelled for this server.".to_string()
        }
        CommandReply::Status { email: Some(email) } => {
            format!("Notifications for this server are registered to {email}.")
        }
        CommandReply::Status { email: None } => {
            "No email notifications are registered in this server.".to_string()
        }
        CommandReply::ModeSet { dev_mode: true } => {
            "Server mode set to development; the notification cooldown is disabled.".to_string()
        }
        CommandReply::ModeSet { dev_mode: false } => "Server mode set to production.".to_string(),
        CommandReply::ExclusionAdded { channel_id } => {
            format!("Channel <#{channel_id}> is now excluded from notifications.")
        }
        CommandReply::ExclusionRemoved { channel_id } => {
            format!("Channel <#{channel_id}> is no longer excluded.")
        }
        CommandReply::ExclusionMissing { channel_id } => {
            format!("Channel <#{channel_id}> is not in the exclusion list.")
        }
        CommandReply::ExclusionList { channel_ids } if channel_ids.is_empty() => {
            "No channels are excluded in this server.".to_string()
        }
        CommandReply::ExclusionList { channel_ids } => {
            let mentions: Vec<String> = channel_ids.iter().map(|id| format!("<#{id}>")).collect();
            format!("Excluded channels: {}", mentions.join(", "))
        }
        CommandReply::Denied { reason } => format!("Permission denied: {reason}."),
        CommandReply::Invalid { reason } => format!("Invalid command: {reason}."),
    }
}

/// Adapter-rendered help text listing every command.
pub fn help_text() -> String {
    "guildmail commands:\n\
     /ping - check that the bot is alive\n\
     /register <email> - receive an email when new messages arrive (at most once per hour)\n\
     /cancel - stop receiving notification emails in this server\n\
     /check - show which email is registered for you in this server\n\
     /exclusion <add|remove|list> [channel] - manage channels that never trigger notifications\n\
     /mode <production|development> - administrators only; development mode disables the hourly cooldown\n\
     /help - show this message"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_mentions_every_registered_command() {
        let help = help_text();
        for name in ["ping", "register", "cancel", "check", "mode", "exclusion", "help"] {
            assert!(help.contains(name), "help text is missing /{name}");
        }
    }

    #[test]
    fn replies_render_to_short_sentences() {
        assert_eq!(render_reply(&CommandReply::Pong), "Pong!");
        assert!(
            render_reply(&CommandReply::Registered {
                email: "me@example.com".to_string()
            })
            .contains("me@example.com")
        );
        assert!(
            render_reply(&CommandReply::Cancelled { removed: 0 }).contains("No email notifications")
        );
        assert!(render_reply(&CommandReply::Cancelled { removed: 2 }).contains("cancelled"));
        assert!(
            render_reply(&CommandReply::ExclusionList {
                channel_ids: vec![]
            })
            .contains("No channels")
        );
        assert!(
            render_reply(&CommandReply::ExclusionList {
                channel_ids: vec![10, 11]
            })
            .contains("<#10>, <#11>")
        );
    }
}
