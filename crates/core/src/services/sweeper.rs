use std::{future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    config::BookingConfig,
    errors::TimelineResult,
    repositories::{AccountStore, SlotStore},
    services::with_deadline,
};

/// Rows removed by each sweep step. `None` marks a step that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub slots: Option<u64>,
    pub codes: Option<u64>,
    pub orgs: Option<u64>,
    pub users: Option<u64>,
}

impl SweepReport {
    pub fn is_complete(&self) -> bool {
        self.slots.is_some() && self.codes.is_some() && self.orgs.is_some() && self.users.is_some()
    }
}

/// Best-effort cleanup of expired slots, verification codes and accounts
/// that were never verified.
pub struct ExpirySweeper {
    slots: Arc<dyn SlotStore>,
    accounts: Arc<dyn AccountStore>,
    grace: TimeDelta,
    timeout: Duration,
}

impl ExpirySweeper {
    pub fn new(
        slots: Arc<dyn SlotStore>,
        accounts: Arc<dyn AccountStore>,
        config: &BookingConfig,
    ) -> Self {
        Self {
            slots,
            accounts,
            grace: config.account_grace(),
            timeout: config.store_timeout(),
        }
    }

    /// Runs every step in order. A failing step is logged and the remaining
    /// steps still run.
    pub async fn sweep(&self, now: DateTime<Utc>) -> SweepReport {
        let cutoff = now - self.grace;

        let report = SweepReport {
            slots: self
                .step("delete_expired_slots", self.slots.delete_expired_slots(now))
                .await,
            codes: self
                .step("delete_expired_codes", self.accounts.delete_expired_codes(now))
                .await,
            orgs: self
                .step("org_delete_expired", self.accounts.org_delete_expired(cutoff))
                .await,
            users: self
                .step("user_delete_expired", self.accounts.user_delete_expired(cutoff))
                .await,
        };

        info!(?report, "expiry sweep finished");
        report
    }

    async fn step<F>(&self, name: &str, fut: F) -> Option<u64>
    where
        F: Future<Output = TimelineResult<u64>>,
    {
        match with_deadline(self.timeout, name, fut).await {
            Ok(removed) => {
                info!(step = name, removed, "sweep step done");
                Some(removed)
            }
            Err(err) => {
                error!(step = name, error = %err, "sweep step failed");
                None
            }
        }
    }
}
