pub mod bot;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod models;
pub mod moderation;
pub mod storage;

use std::sync::Arc;

use tracing::{error, info};

use crate::commands::giveaway::GiveawayManager;
use crate::config::Config;
use crate::dispatch::{CommandRegistry, Dispatcher};
use crate::error::Result;
use crate::storage::ResponseStore;

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    info!("Starting with {:?}", config);

    let store = Arc::new(ResponseStore::new(config.responses_path.clone()));
    let giveaways = Arc::new(GiveawayManager::new());

    let registry = CommandRegistry::load(commands::definitions(store.clone(), giveaways.clone()))?;
    info!("Loaded {} commands", registry.len());
    let router = events::router(&config, store, giveaways)?;

    let dispatcher = Arc::new(Dispatcher::new(registry, router));
    bot::run(config, dispatcher).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        error!("Client error: {}", err);
        std::process::exit(1);
    }
}
