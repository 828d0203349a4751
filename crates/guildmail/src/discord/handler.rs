//! Serenity event handler bridging Discord events into the engine.

use crate::config::DiscordConfig;
use crate::discord::commands::{command_definitions, help_text, option_values, render_reply};
use guildmail_core::{CommandRegistry, CommandRequest, MessageEvent, NotificationOrchestrator};
use serenity::all::{
    ActivityData, ChannelId, Command, CommandInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, EventHandler, GuildId, Interaction, Message, Ready,
};
use serenity::async_trait;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Event handler wiring message events into the orchestrator and command
/// interactions into the registry.
pub struct GuildmailHandler {
    orchestrator: NotificationOrchestrator,
    registry: Arc<CommandRegistry>,
    config: DiscordConfig,
}

impl GuildmailHandler {
    /// Create a handler over the engine collaborators.
    pub fn new(
        orchestrator: NotificationOrchestrator,
        registry: Arc<CommandRegistry>,
        config: DiscordConfig,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            config,
        }
    }

    /// Guild display name, falling back to the id when the fetch fails.
    async fn guild_name(ctx: &Context, guild_id: GuildId) -> String {
        match ctx.http.get_guild(guild_id).await {
            Ok(guild) => guild.name,
            Err(_) => guild_id.to_string(),
        }
    }

    async fn command_response(&self, ctx: &Context, command: &CommandInteraction) -> String {
        if command.data.name == "help" {
            return help_text();
        }

        let Some(guild_id) = command.guild_id else {
            return "This command only works inside a server.".to_string();
        };

        let is_admin = command
            .member
            .as_ref()
            .and_then(|member| member.permissions)
            .map(|permissions| permissions.administrator())
            .unwrap_or(false);

        let request = CommandRequest {
            user_id: command.user.id.get() as i64,
            guild_id: guild_id.get() as i64,
            guild_name: Self::guild_name(ctx, guild_id).await,
            is_admin,
            args: option_values(&command.data.options),
        };

        match self.registry.dispatch(&command.data.name, &request).await {
            Ok(reply) => render_reply(&reply),
            Err(error) => {
                error!(%error, command = %command.data.name, "command failed");
                "The command failed due to an internal error. Please try again later.".to_string()
            }
        }
    }
}

#[async_trait]
impl EventHandler for GuildmailHandler {
    #[instrument(skip(self, ctx, ready), fields(user = %ready.user.name))]
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("connected to Discord");
        ctx.set_activity(Some(ActivityData::playing("/help")));

        match Command::set_global_commands(&ctx.http, command_definitions()).await {
            Ok(commands) => info!(count = commands.len(), "registered application commands"),
            Err(error) => error!(%error, "failed to register application commands"),
        }

        if let Some(channel_id) = self.config.log_channel_id {
            let channel = ChannelId::new(channel_id);
            if let Err(error) = channel.say(&ctx.http, "guildmail is online.").await {
                warn!(%error, "startup announcement failed");
            }
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Bot and DM traffic never reaches the engine.
        if msg.author.bot {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };

        let guild_name = Self::guild_name(&ctx, guild_id).await;
        let channel_name = msg
            .channel_id
            .name(&ctx)
            .await
            .unwrap_or_else(|_| msg.channel_id.to_string());

        let event = MessageEvent {
            id: msg.id.get() as i64,
            guild_id: guild_id.get() as i64,
            guild_name,
            channel_id: msg.channel_id.get() as i64,
            channel_name,
            author_id: msg.author.id.get() as i64,
            author_tag: msg.author.tag(),
            author_is_bot: msg.author.bot,
            content: msg.content.clone(),
            permalink_url: msg.link(),
        };

        if let Err(error) = self.orchestrator.on_message(&event).await {
            error!(%error, message_id = event.id, "message event processing failed");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let content = self.command_response(&ctx, &command).await;
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(true),
        );
        if let Err(error) = command.create_response(&ctx.http, response).await {
            error!(%error, "failed to respond to interaction");
        }
    }
}
