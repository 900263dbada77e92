use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    config::BookingConfig,
    errors::{TimelineError, TimelineResult},
    models::{
        schedule::{CreateScheduleRequest, UpdateScheduleRequest, WorkerSchedule},
        slot::Slot,
    },
    repositories::{ScheduleStore, SlotStore},
    services::with_deadline,
};

/// Longest range a single slot listing may cover.
const MAX_LISTING_DAYS: i64 = 62;

/// Schedule administration and slot browsing.
pub struct AvailabilityService {
    schedules: Arc<dyn ScheduleStore>,
    slots: Arc<dyn SlotStore>,
    timeout: Duration,
}

impl AvailabilityService {
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        slots: Arc<dyn SlotStore>,
        config: &BookingConfig,
    ) -> Self {
        Self {
            schedules,
            slots,
            timeout: config.store_timeout(),
        }
    }

    pub async fn schedule_add(
        &self,
        org_id: Uuid,
        request: CreateScheduleRequest,
    ) -> TimelineResult<WorkerSchedule> {
        let schedule = request.into_schedule(org_id)?;
        let stored =
            with_deadline(self.timeout, "schedule_add", self.schedules.schedule_add(&schedule))
                .await?;
        info!(
            schedule_id = %stored.schedule_id,
            worker_id = %stored.worker_id,
            weekday = stored.weekday,
            "schedule added"
        );
        Ok(stored)
    }

    pub async fn schedule_update(
        &self,
        schedule_id: Uuid,
        request: UpdateScheduleRequest,
    ) -> TimelineResult<WorkerSchedule> {
        let current =
            with_deadline(self.timeout, "schedule", self.schedules.schedule(schedule_id)).await?;
        let schedule = request.apply(current)?;
        with_deadline(
            self.timeout,
            "schedule_update",
            self.schedules.schedule_update(&schedule),
        )
        .await
    }

    pub async fn schedule_delete(&self, schedule_id: Uuid) -> TimelineResult<()> {
        with_deadline(
            self.timeout,
            "schedule_delete",
            self.schedules.schedule_delete(schedule_id),
        )
        .await
    }

    pub async fn schedules(
        &self,
        org_id: Uuid,
        worker_id: Option<Uuid>,
    ) -> TimelineResult<Vec<WorkerSchedule>> {
        with_deadline(
            self.timeout,
            "schedules",
            self.schedules.schedules(org_id, worker_id),
        )
        .await
    }

    /// Slots of a worker starting in `[from, to)`, earliest first.
    pub async fn slots(
        &self,
        worker_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TimelineResult<Vec<Slot>> {
        if to <= from {
            return Err(TimelineError::Validation(
                "slot range end must be after its start".to_string(),
            ));
        }
        if to - from > TimeDelta::days(MAX_LISTING_DAYS) {
            return Err(TimelineError::Validation(format!(
                "slot range may not exceed {} days",
                MAX_LISTING_DAYS
            )));
        }
        with_deadline(self.timeout, "slots", self.slots.slots(worker_id, from..to)).await
    }

    /// Claims or releases a slot directly.
    pub async fn update_slot(&self, slot_id: Uuid, busy: bool) -> TimelineResult<Slot> {
        with_deadline(self.timeout, "update_slot", self.slots.update_slot(slot_id, busy)).await?;
        with_deadline(self.timeout, "slot", self.slots.slot(slot_id)).await
    }
}
