//! VoicePay Telegram bot - Main executable
//!
//! Entry point for the bot that turns typed voice transcripts and payment
//! links into Algorand TestNet, mobile money and bank payments.
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use teloxide::{dptree, prelude::*, utils::command::BotCommands as _, Bot};
use voicepay::algorand::AlgodClient;
use voicepay::commands::BotCommands;
use voicepay::{AppConfig, Router};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting VoicePay Telegram Bot v{}", voicepay::VERSION);

    let config = AppConfig::from_env()?;

    // Create Telegram bot instance
    let bot = Bot::new(&config.telegram_bot_token);

    // Setup database connection pool
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to create database connection pool")?;
    let db_pool = Arc::new(db_pool);

    // Run database migrations
    info!("Running database migrations...");
    if let Err(e) = sqlx::migrate!("./migrations").run(&*db_pool).await {
        error!("Failed to run migrations: {}", e);
        return Err(anyhow::Error::from(e));
    }
    info!("Migrations completed successfully");

    info!("Using algod at {}", config.algod_url);
    let algod_client = AlgodClient::new(&config.algod_url, config.algod_token.clone())
        .with_polling(
            Duration::from_millis(config.confirmation_poll_ms),
            config.confirmation_max_attempts,
        );

    // Initialize the application components
    info!("Initializing bot application...");
    let (router, bot, service_container, storage, mut refresh_service) =
        voicepay::create_application(bot, db_pool.clone(), algod_client, config);

    if let Err(e) = bot.set_my_commands(BotCommands::bot_commands()).await {
        error!("Failed to register bot commands: {}", e);
    }

    // Start balance refresh background service
    if let Err(e) = refresh_service.start().await {
        error!("Failed to start balance refresh service: {}", e);
    }

    // Get the handler from the router
    let handler = router.setup_handlers();

    // Build dispatcher with dependency injections and control-C handling
    let mut dispatcher = teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service_container, storage])
        .enable_ctrlc_handler()
        .build();

    info!("Bot is running! Press Ctrl+C to stop.");
    dispatcher.dispatch().await;

    info!("Stopping balance refresh service...");
    refresh_service.stop().await;
    db_pool.close().await;

    Ok(())
}
