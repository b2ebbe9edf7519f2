//! Request queue bot
//!
//! Turns messages in the winner queue channel into structured requests,
//! merges reply notes into them, and runs the small per-channel policies
//! (media relay, gallery reactions, activity moderation, ban request hand-off).

mod config;
mod convert;
mod dispatcher;
mod errors;
mod handlers;
mod health;
mod interactions;
mod locks;
#[cfg(test)]
mod mock;
mod platform;
mod policies;
mod validator;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::dispatcher::RequestDispatcher;
use crate::handlers::{Dispatcher, Handler};
use crate::health::AppState;
use crate::platform::SerenityPlatform;
use crate::validator::LogOnlyValidator;

/// Request queue bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/request-bot.toml")]
    config: String,

    /// Discord bot token (overrides config file)
    #[arg(long, env = "DISCORD_BOT_TOKEN")]
    bot_token: Option<String>,

    /// Winner queue channel id (overrides config file)
    #[arg(long, env = "WINNER_QUEUE_CHANNEL_ID")]
    winner_queue: Option<u64>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3001")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "request_bot=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting request queue bot");

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        Config::from_env()?
    };

    if let Some(bot_token) = args.bot_token {
        config.discord.bot_token = bot_token;
    }
    if let Some(winner_queue) = args.winner_queue {
        config.channels.winner_queue = Some(winner_queue);
    }
    if config.discord.bot_token.is_empty() {
        anyhow::bail!("No Discord bot token configured");
    }

    for w in config.warnings() {
        warn!("Config: {}", w);
    }

    let config = Arc::new(config);
    let health_port = args.health_port;

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord.bot_token, intents)
        .event_handler(Handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    // The dispatcher talks to Discord through the client's HTTP handle
    let dispatcher: Arc<Dispatcher> = Arc::new(RequestDispatcher::new(
        SerenityPlatform::new(client.http.clone()),
        config.clone(),
        Arc::new(LogOnlyValidator),
    ));
    let health_state = AppState::new(dispatcher.stats());

    {
        let mut data = client.data.write().await;
        data.insert::<Dispatcher>(dispatcher);
        data.insert::<AppState>(health_state.clone());
    }

    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                Err(e) => {
                    warn!("SIGTERM handler unavailable: {}", e);
                    tokio::signal::ctrl_c().await.ok();
                }
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
        info!("Shutdown signal received, stopping Discord client...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection...");

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("Request bot stopped");
    Ok(())
}
