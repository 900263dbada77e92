//! # Booking Configuration
//!
//! Tunables of the slot generator, the reminder sweep and the expiry sweep.
//!
//! ## Environment Variables
//!
//! - `SLOT_GRANULARITY_MINUTES`: length of one slot (default: 30)
//! - `SLOT_HORIZON_DAYS`: how many days ahead slots are generated (default: 14)
//! - `REMINDER_WINDOW_HOURS`: how far ahead reminders are sent (default: 24)
//! - `ACCOUNT_GRACE_HOURS`: how long an unverified account survives (default: 24)
//! - `STORE_TIMEOUT_SECONDS`: deadline for a single storage call (default: 5)
//! - `SCHEDULER_INTERVAL_SECONDS`: period of the scheduler trigger (default: 86400)

use std::{env, str::FromStr, time::Duration};

use chrono::TimeDelta;
use eyre::{Result, WrapErr, eyre};

#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub slot_granularity_minutes: u32,
    pub slot_horizon_days: u32,
    pub reminder_window_hours: u32,
    pub account_grace_hours: u32,
    pub store_timeout_seconds: u64,
    pub scheduler_interval_seconds: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_granularity_minutes: 30,
            slot_horizon_days: 14,
            reminder_window_hours: 24,
            account_grace_hours: 24,
            store_timeout_seconds: 5,
            scheduler_interval_seconds: 86_400,
        }
    }
}

impl BookingConfig {
    /// Loads the configuration, falling back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but does not parse, or when
    /// [`BookingConfig::validate`] rejects the result.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            slot_granularity_minutes: var_or(
                "SLOT_GRANULARITY_MINUTES",
                defaults.slot_granularity_minutes,
            )?,
            slot_horizon_days: var_or("SLOT_HORIZON_DAYS", defaults.slot_horizon_days)?,
            reminder_window_hours: var_or(
                "REMINDER_WINDOW_HOURS",
                defaults.reminder_window_hours,
            )?,
            account_grace_hours: var_or("ACCOUNT_GRACE_HOURS", defaults.account_grace_hours)?,
            store_timeout_seconds: var_or(
                "STORE_TIMEOUT_SECONDS",
                defaults.store_timeout_seconds,
            )?,
            scheduler_interval_seconds: var_or(
                "SCHEDULER_INTERVAL_SECONDS",
                defaults.scheduler_interval_seconds,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects zero values that would stall generation, time out every
    /// storage call or make the scheduler interval panic.
    pub fn validate(&self) -> Result<()> {
        if self.slot_granularity_minutes == 0 {
            return Err(eyre!("SLOT_GRANULARITY_MINUTES must be greater than zero"));
        }
        if self.slot_horizon_days == 0 {
            return Err(eyre!("SLOT_HORIZON_DAYS must be greater than zero"));
        }
        if self.store_timeout_seconds == 0 {
            return Err(eyre!("STORE_TIMEOUT_SECONDS must be greater than zero"));
        }
        if self.scheduler_interval_seconds == 0 {
            return Err(eyre!("SCHEDULER_INTERVAL_SECONDS must be greater than zero"));
        }
        Ok(())
    }

    pub fn granularity(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.slot_granularity_minutes))
    }

    pub fn reminder_window(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.reminder_window_hours))
    }

    pub fn account_grace(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.account_grace_hours))
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds)
    }

    pub fn scheduler_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler_interval_seconds)
    }
}

fn var_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {} value", name)),
        Err(_) => Ok(default),
    }
}
