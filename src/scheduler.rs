use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use timeline_api::config::parse_log_level;
use timeline_core::{
    config::BookingConfig,
    services::{ExpirySweeper, RecordManager, SlotGenerator},
};
use timeline_db::{PgStore, create_pool, schema::initialize_database};
use timeline_notifier::{build_notifier, config::NotifierConfig};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Periodic jobs sharing one store connection.
struct Jobs {
    generator: SlotGenerator,
    sweeper: ExpirySweeper,
    records: RecordManager,
}

impl Jobs {
    async fn run_once(&self) {
        let now = Utc::now();

        match self.generator.generate_slots(now).await {
            Ok(report) => info!(?report, "Slot generation finished"),
            Err(e) => error!("Slot generation failed: {}", e),
        }

        let report = self.sweeper.sweep(now).await;
        if report.is_complete() {
            info!(?report, "Expiry sweep finished");
        } else {
            warn!(?report, "Expiry sweep finished with failed steps");
        }

        match self.records.send_reminders(now).await {
            Ok(report) => info!(?report, "Reminder pass finished"),
            Err(e) => error!("Reminder pass failed: {}", e),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let level = parse_log_level(&std::env::var("LOG_LEVEL").unwrap_or_default());
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;
    let config = BookingConfig::from_env()?;
    let notifier = build_notifier(&NotifierConfig::from_env()?)?;

    // Create database connection pool
    let db_pool = create_pool(&database_url).await?;
    initialize_database(&db_pool).await?;

    let store = Arc::new(PgStore::new(db_pool));
    let jobs = Jobs {
        generator: SlotGenerator::new(store.clone(), store.clone(), &config),
        sweeper: ExpirySweeper::new(store.clone(), store.clone(), &config),
        records: RecordManager::new(store, notifier, &config),
    };

    info!(
        interval_seconds = config.scheduler_interval_seconds,
        "Starting Timeline scheduler"
    );

    let mut ticker = interval(config.scheduler_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => jobs.run_once().await,
            _ = tokio::signal::ctrl_c() => {
                info!("Scheduler shutting down");
                break;
            }
        }
    }

    Ok(())
}
