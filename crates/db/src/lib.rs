//! Storage for the Timeline booking service.
//!
//! [`PgStore`] is the production backend. [`MemoryStore`] keeps the same
//! semantics in process and backs the service and HTTP tests.

pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub use memory::MemoryStore;
pub use repositories::PgStore;

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .wrap_err("failed to connect to the database")?;

    Ok(pool)
}
