// Main entry point for the job alert pipeline

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use jobwatch::{Aggregator, Config, HttpFetcher, Pipeline, SourceRegistry, SqliteStore};
use telegram::TelegramClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jobwatch=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting jobwatch");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Open database (migrations run on connect)
    tracing::info!("Opening database...");
    let store = Arc::new(
        SqliteStore::connect(&config.database_url)
            .await
            .context("Failed to open database")?,
    );
    tracing::info!("Database ready");

    // Assemble the pipeline
    let fetcher = HttpFetcher::new(Duration::from_secs(config.http_timeout_secs))
        .context("Failed to build HTTP client")?;
    let registry = SourceRegistry::builtin();
    tracing::info!("Watching {} sources", registry.len());

    let transport = Arc::new(TelegramClient::new(config.telegram_bot_token.clone()));
    let pipeline = Arc::new(Pipeline::new(
        Aggregator::new(registry, Arc::new(fetcher)),
        store.clone(),
        store,
        transport,
    ));

    // Start the daily schedule
    let _scheduler = jobwatch::scheduler::start_scheduler(pipeline, &config.alert_time)
        .await
        .context("Failed to start scheduler")?;

    tracing::info!("jobwatch running; press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutting down");

    Ok(())
}
