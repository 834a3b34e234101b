use anyhow::Result as AnyResult;
use clap::Parser;
use serenity::prelude::*;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod args;
mod cache_keys;
mod clock;
mod commands;
mod config;
mod delayed_message;
mod dispatcher;
mod event;
mod greeting;
mod handler;
mod init;
mod reply;
mod services;
mod tasks;
#[cfg(test)]
mod testing;
mod weather;

use cache_keys::*;
use clock::{Clock, SystemClock};
use handler::Handler;
use init::*;
use services::Services;
use tasks::timer_queue::TimerQueue;
use weather::WttrClient;

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args::Args {
        config_file_path,
        env_file,
    } = args::Args::parse();
    load_env_file(env_file.as_deref())?;
    let token = resolve_token(env::var(TOKEN_VAR).ok())?;
    let config = Arc::new(read_config_file(&config_file_path)?);
    config.timezone()?;
    info!("IN | Loaded config.");
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (timer_queue, _timer_task) = TimerQueue::start(clock.clone());
    let services = Services {
        weather: Arc::new(WttrClient::new(&config)),
        scheduler: Arc::new(timer_queue),
        clock,
        config: config.clone(),
    };
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&token, intents)
        .application_id(config.application_id)
        .event_handler(Handler)
        .await?;
    info!("IN | Created client.");
    client
        .data
        .write()
        .await
        .insert::<ServicesKey>(Arc::new(services));
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("IN | Received ctrl+c. Shutting down; pending delayed messages are dropped.");
            shard_manager.lock().await.shutdown_all().await;
        }
    });
    info!("IN | Starting client.");
    if let Err(why) = client.start().await {
        error!("IN | Client error: {:?}", why);
    }
    Ok(())
}
