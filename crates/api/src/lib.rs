//! # Timeline API
//!
//! The API crate provides the web server for the Timeline booking service.
//! It exposes the service catalog, workers, worker schedules, slot
//! availability, booking records and the manual triggers of the periodic
//! jobs.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Decode requests and delegate to the booking services
//! - **Middleware**: Error mapping shared by every endpoint
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Storage is reached through the
//! services of `timeline-core`, so the same router runs on PostgreSQL or on
//! the in-memory store.

/// Configuration module for API settings
pub mod config;
/// Request handlers that delegate to the booking services
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::{Router, http::HeaderValue};
use eyre::Result;
use timeline_core::{
    config::BookingConfig,
    repositories::{
        AccountStore, CatalogStore, Notifier, RecordStore, ScheduleStore, SlotStore, WorkerStore,
    },
    services::{AvailabilityService, CatalogService, ExpirySweeper, RecordManager, SlotGenerator},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Shared application state that is accessible to all request handlers
///
/// Each service receives only the storage capability it needs.
pub struct ApiState {
    /// Schedule administration and slot browsing
    pub availability: AvailabilityService,
    /// Services and workers of each organization
    pub catalog: CatalogService,
    /// Booking records, feedback and reminders
    pub records: RecordManager,
    /// Slot generation from weekly schedules
    pub generator: SlotGenerator,
    /// Cleanup of expired slots, codes and accounts
    pub sweeper: ExpirySweeper,
}

impl ApiState {
    /// Builds every service on top of one store implementing all storage traits.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use timeline_api::ApiState;
    /// use timeline_core::config::BookingConfig;
    /// use timeline_db::MemoryStore;
    /// use timeline_notifier::LogNotifier;
    ///
    /// let state = ApiState::new(
    ///     Arc::new(MemoryStore::new()),
    ///     Arc::new(LogNotifier),
    ///     &BookingConfig::default(),
    /// );
    /// ```
    pub fn new<S>(store: Arc<S>, notifier: Arc<dyn Notifier>, config: &BookingConfig) -> Self
    where
        S: CatalogStore
            + WorkerStore
            + ScheduleStore
            + SlotStore
            + RecordStore
            + AccountStore
            + 'static,
    {
        let services: Arc<dyn CatalogStore> = store.clone();
        let workers: Arc<dyn WorkerStore> = store.clone();
        let schedules: Arc<dyn ScheduleStore> = store.clone();
        let slots: Arc<dyn SlotStore> = store.clone();
        let records: Arc<dyn RecordStore> = store.clone();
        let accounts: Arc<dyn AccountStore> = store;

        Self {
            availability: AvailabilityService::new(schedules.clone(), slots.clone(), config),
            catalog: CatalogService::new(services, workers, config),
            records: RecordManager::new(records, notifier, config),
            generator: SlotGenerator::new(schedules, slots.clone(), config),
            sweeper: ExpirySweeper::new(slots, accounts, config),
        }
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Service catalog and worker endpoints
        .merge(routes::catalog::routes())
        // Schedule management endpoints
        .merge(routes::schedule::routes())
        // Slot availability endpoints
        .merge(routes::slot::routes())
        // Booking record endpoints
        .merge(routes::record::routes())
        // Manual job triggers
        .merge(routes::admin::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and state
///
/// Tracing must already be initialized by the caller.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(allowed)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request tracing and timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(config.request_timeout())),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
