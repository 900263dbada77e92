//! HTTP server settings read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | required |
//! | `API_HOST` | `0.0.0.0` |
//! | `API_PORT` | `3000` |
//! | `LOG_LEVEL` | `info` |
//! | `API_CORS_ORIGINS` | unset, no CORS layer |
//! | `API_REQUEST_TIMEOUT_SECONDS` | `30` |
//!
//! Slot and sweep tunables live in
//! [`BookingConfig`](timeline_core::config::BookingConfig).

use std::{env, time::Duration};

use eyre::{Result, WrapErr, eyre};
use tracing::Level;

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub log_level: Level,
    /// Browser origins allowed to call the booking endpoints.
    pub cors_origins: Option<Vec<String>>,
    /// Upper bound for a whole request, storage deadlines included.
    pub request_timeout_seconds: u64,
}

impl ApiConfig {
    /// Reads the server settings.
    ///
    /// Fails without `DATABASE_URL`, on a port that is not a `u16`, and on a
    /// request timeout that is zero or not a number.
    pub fn from_env() -> Result<Self> {
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("API_PORT") {
            Ok(raw) => raw.trim().parse().wrap_err("API_PORT must be a port number")?,
            Err(_) => 3000,
        };

        let database_url =
            env::var("DATABASE_URL").wrap_err("DATABASE_URL must point at the booking database")?;

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_default());

        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty());

        let request_timeout_seconds = match env::var("API_REQUEST_TIMEOUT_SECONDS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .wrap_err("API_REQUEST_TIMEOUT_SECONDS must be a whole number of seconds")?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECONDS,
        };
        if request_timeout_seconds == 0 {
            return Err(eyre!("API_REQUEST_TIMEOUT_SECONDS must be greater than zero"));
        }

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout_seconds,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Splits a comma separated origin list, dropping blank entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Maps a `LOG_LEVEL` value to a tracing level. Unknown or empty values
/// fall back to INFO.
pub fn parse_log_level(raw: &str) -> Level {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
