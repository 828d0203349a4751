use clap::Parser;
use guildmail::{Cli, Commands, GuildmailBot, GuildmailConfig};
use guildmail_core::{
    CooldownGate, DeliveryFanout, ExclusionFilter, GuildModeService, NotificationOrchestrator,
    SubscriberRegistry, SystemClock, command::standard_registry,
};
use guildmail_database::{PostgresStore, establish_connection, run_migrations};
use guildmail_mail::HttpMailer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => run(config).await?,
    }

    Ok(())
}

async fn run(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = GuildmailConfig::from_file(&config_path)?;
    info!(config = %config_path.display(), "configuration loaded");

    let mut conn = establish_connection()?;
    run_migrations(&mut conn)?;
    let store = Arc::new(PostgresStore::new(conn));

    let api_key = std::env::var("MAIL_API_KEY")
        .map_err(|_| "MAIL_API_KEY environment variable not set")?;
    let mailer = Arc::new(HttpMailer::new(&config.mail, api_key)?);

    let subscribers = SubscriberRegistry::new(store.clone());
    let modes = GuildModeService::new(store.clone());
    let exclusions = ExclusionFilter::new(store.clone());
    let gate = CooldownGate::new(store.clone(), modes.clone(), Arc::new(SystemClock));
    let fanout = DeliveryFanout::new(
        subscribers.clone(),
        mailer.clone(),
        config.mail.from_address.clone(),
    );
    let orchestrator =
        NotificationOrchestrator::new(exclusions.clone(), store.clone(), gate, fanout);
    let registry = standard_registry(
        subscribers,
        modes,
        exclusions,
        mailer,
        config.mail.from_address.clone(),
    );

    let token = std::env::var("DISCORD_TOKEN")
        .map_err(|_| "DISCORD_TOKEN environment variable not set")?;

    let mut bot = GuildmailBot::new(token, orchestrator, registry, config.discord).await?;
    bot.start().await?;

    Ok(())
}
