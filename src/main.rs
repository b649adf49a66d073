//! Nur - Quran companion chat bot
//!
//! A modular command bot serving Quran text, tafsir, recitations and a
//! multiple-choice quiz.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `router` - Transport-neutral event model and the dispatch pipeline
//! - `commands` - Command registry and per-invocation context
//! - `plugins` - Command handlers (extensible)
//! - `events` - Rate limiting, first-contact welcome, ambient replies
//! - `quiz` - Question bank and per-chat quiz sessions
//! - `services` - Quran content client
//! - `database` - JSON-backed chat and user sets
//! - `cache` - LRU-based caching with Moka
//! - `permissions` - Owner and scope checks
//! - `bot` - Application state and the Telegram transport (with Throttle)
//! - `i18n` - Localized strings
//! - `utils` - Utility functions

mod bot;
mod cache;
mod commands;
mod config;
mod database;
mod events;
mod i18n;
mod permissions;
mod plugins;
mod quiz;
mod router;
mod services;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bot::{AppState, TelegramOutbound};
use commands::CommandRegistry;
use config::Config;
use database::Database;
use quiz::QuestionBank;
use router::Router;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quran_bot=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Quran bot...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}, language: {}", config.bot_mode, config.lang);

    i18n::init();

    let db = Database::open(&config.data_dir).await;
    info!(
        "Data directory {}: {} chats, {} users",
        config.data_dir.display(),
        db.chats.len().await,
        db.users.len().await
    );

    let bank = match QuestionBank::load(&config.quiz_path).await {
        Ok(bank) => bank,
        Err(e) => {
            warn!("Quiz disabled: {}", e);
            QuestionBank::default()
        }
    };

    if config.owners.is_empty() {
        info!("No owners configured (OWNER_NUMBER / OWNER_LID are empty)");
    } else {
        info!("Bot owners: {:?}", config.owners);
    }

    // Throttle respects Telegram's rate limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    // - 20 messages per minute to the same group
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    let outbound = Arc::new(TelegramOutbound::new(bot.clone()));
    let state = AppState::new(config.clone(), outbound, db, bank)?;

    let mut registry = CommandRegistry::new();
    plugins::register_all(&mut registry);
    info!("Registered {} commands", registry.len());

    let router = Arc::new(Router::new(state, Arc::new(registry)).with_bot_username(me.username()));
    let dispatcher = bot::build_dispatcher(bot.clone(), router);

    bot::run(&config, dispatcher, bot).await
}
