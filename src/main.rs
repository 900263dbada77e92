use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use timeline_api::{ApiState, config::ApiConfig};
use timeline_core::config::BookingConfig;
use timeline_db::{PgStore, create_pool, schema::initialize_database};
use timeline_notifier::{build_notifier, config::NotifierConfig};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    let booking = BookingConfig::from_env()?;
    let notify = NotifierConfig::from_env()?;

    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Timeline API");

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let store = Arc::new(PgStore::new(db_pool));
    let notifier = build_notifier(&notify)?;
    let state = Arc::new(ApiState::new(store, notifier, &booking));

    // Start API server
    timeline_api::start_server(config, state).await?;

    Ok(())
}
