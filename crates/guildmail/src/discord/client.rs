//! Discord bot client setup and lifecycle management.

use crate::config::DiscordConfig;
use crate::discord::handler::GuildmailHandler;
use guildmail_core::{CommandRegistry, NotificationOrchestrator};
use serenity::Client;
use serenity::all::GatewayIntents;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Main Discord client for guildmail.
///
/// Owns the Serenity client and wires the event handler to the engine
/// collaborators constructed at process start.
pub struct GuildmailBot {
    client: Client,
}

impl GuildmailBot {
    /// Create a new bot instance.
    ///
    /// # Errors
    ///
    /// Returns an error when the Serenity client fails to initialize (for
    /// example an invalid token).
    #[instrument(skip_all, fields(token_len = token.len()))]
    pub async fn new(
        token: String,
        orchestrator: NotificationOrchestrator,
        registry: CommandRegistry,
        config: DiscordConfig,
    ) -> Result<Self, serenity::Error> {
        let handler = GuildmailHandler::new(orchestrator, Arc::new(registry), config);

        let intents =
            GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

        info!("building Serenity client");
        let client = Client::builder(&token, intents)
            .event_handler(handler)
            .await?;

        Ok(Self { client })
    }

    /// Start the bot and block until shutdown.
    ///
    /// Ctrl+C shuts the gateway connection down cleanly.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), serenity::Error> {
        let shard_manager = self.client.shard_manager.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
                return;
            }
            info!("shutdown signal received");
            shard_manager.shutdown_all().await;
        });

        info!("starting Discord bot");
        self.client.start().await
    }
}
