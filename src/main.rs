//! Musebot CLI entry point.

use anyhow::Context as _;
use clap::Parser;
use serenity::all::GatewayIntents;
use tracing_subscriber::EnvFilter;

use musebot::channels::ActiveChannelSet;
use musebot::conversation::HistoryStore;
use musebot::discord::{BotDeps, Handler};
use musebot::engage::EngageSettings;
use musebot::gif::GifClient;
use musebot::image::{ImagineClient, ProdiaClient, RembgClient};
use musebot::llm::{ChatClient, ModerationGate, SearchClient, TranscriptClient, TranslateClient};

use std::sync::Arc;

#[derive(Parser)]
#[command(name = "musebot")]
#[command(about = "A Discord chat bot bridging channels to LLM and image generation APIs")]
struct Cli {
    /// Path to config file (optional)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Musebot...");

    let config = if let Some(config_path) = cli.config {
        musebot::config::Config::load_from_path(&config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))?
    } else {
        musebot::config::Config::load().with_context(|| "failed to load configuration")?
    };

    tracing::info!(data_dir = %config.data_dir.display(), "Configuration loaded");

    let token = config.require_token()?.to_string();

    let http = reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(30))
        .build()
        .with_context(|| "failed to build HTTP client")?;

    let chat = Arc::new(ChatClient::new(http.clone(), &config.chat));
    let moderation = ModerationGate::new(
        chat.clone(),
        config.moderation.nsfw_filter,
        config.moderation.blacklist.clone(),
    );
    let search = SearchClient::new(http.clone(), chat.clone(), &config.search);

    let active_channels = ActiveChannelSet::load(config.channels_path())?;

    let deps = Arc::new(BotDeps::new(
        musebot::llm::build_instructions(&config.load_instructions(), config.search.internet_access),
        config.persona_name(),
        EngageSettings {
            allow_dm: config.engage.allow_dm,
            smart_mention: config.engage.smart_mention,
            trigger_words: config.engage.trigger_words.clone(),
        },
        active_channels,
        HistoryStore::new(config.max_history),
        chat,
        moderation,
        search,
        TranscriptClient::new(http.clone()),
        TranslateClient::new(http.clone()),
        ImagineClient::new(http.clone()),
        ProdiaClient::new(http.clone()),
        RembgClient::new(http.clone()),
        GifClient::new(http),
        config.imagine.add_reactions,
        config.presence.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let _keepalive = if config.keepalive.enabled {
        Some(musebot::keepalive::start_keepalive_server(&config.keepalive, shutdown_rx).await?)
    } else {
        None
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::Client::builder(&token, intents)
        .event_handler(Handler { deps })
        .await
        .with_context(|| "failed to build Discord client")?;

    tracing::info!("Musebot started successfully");

    tokio::select! {
        result = client.start() => {
            if let Err(error) = result {
                tracing::error!(%error, "Discord client stopped");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(true);
    client.shard_manager.shutdown_all().await;

    tracing::info!("Musebot stopped");
    Ok(())
}
