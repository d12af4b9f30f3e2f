use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serenity::prelude::*;
use tracing::{error, info};

use crate::config::Config;
use crate::describer::OpenAiDescriber;
use crate::handler::Handler;
use crate::monitor::AltTextMonitor;
use crate::stats::FileStats;

mod config;
mod describer;
mod handler;
mod monitor;
mod presence;
mod reminder;
mod stats;

#[tokio::main]
async fn main() -> Result<()> {
    shared::init_tracing!()?;

    let config = Config::from_env()?;

    let stats = FileStats::new(&config.stats_path);
    info!("Recording reminder stats in {}", stats.path().display());

    let monitor = AltTextMonitor::new(
        OpenAiDescriber::new(config.describer),
        stats,
        StdRng::from_os_rng(),
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::DIRECT_MESSAGES;

    let mut client = Client::builder(&config.bot.discord_token, intents)
        .event_handler(Handler::new(monitor))
        .await
        .context("Error creating client")?;

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    Ok(())
}
