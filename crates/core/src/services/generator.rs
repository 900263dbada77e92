use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::BookingConfig,
    errors::TimelineResult,
    models::{schedule::WorkerSchedule, slot::SlotDraft},
    repositories::{ScheduleStore, SlotStore},
    services::with_deadline,
};

/// Drafts are written in chunks so one insert never carries an unbounded
/// parameter list.
const INSERT_CHUNK: usize = 500;

/// Expands one schedule entry into the slots of the next `horizon_days` days
/// starting at `from`.
///
/// Slots sit on a fixed grid anchored at the schedule start. A trailing
/// interval shorter than `granularity` is dropped, intervals overlapping the
/// break are skipped, and slots starting before `now` are never produced.
pub fn expand_schedule(
    schedule: &WorkerSchedule,
    from: NaiveDate,
    horizon_days: u32,
    granularity: TimeDelta,
    now: DateTime<Utc>,
) -> Vec<SlotDraft> {
    let mut drafts = Vec::new();
    if granularity <= TimeDelta::zero() {
        return drafts;
    }

    for offset in 0..i64::from(horizon_days) {
        let date = from + TimeDelta::days(offset);
        if date.weekday().number_from_monday() != u32::from(schedule.weekday) {
            continue;
        }

        let window_end = date.and_time(schedule.end).and_utc();
        let pause = schedule
            .break_window
            .map(|b| (date.and_time(b.start).and_utc(), date.and_time(b.end).and_utc()));

        let mut cursor = date.and_time(schedule.start).and_utc();
        while cursor + granularity <= window_end {
            let slot_end = cursor + granularity;
            let in_break = pause.is_some_and(|(start, end)| cursor < end && slot_end > start);
            if !in_break && cursor >= now {
                drafts.push(SlotDraft {
                    worker_id: schedule.worker_id,
                    org_id: schedule.org_id,
                    start: cursor,
                    end: slot_end,
                });
            }
            cursor = slot_end;
        }
    }

    drafts
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Schedule entries read from the store.
    pub schedules: usize,
    /// Malformed entries that produced nothing.
    pub skipped: usize,
    pub drafted: usize,
    /// Slots that did not exist before this run.
    pub inserted: u64,
}

/// Materializes slots from the weekly schedules.
///
/// Runs are idempotent: the store ignores drafts whose (worker, start) pair
/// already exists, so a second run over the same horizon inserts nothing.
pub struct SlotGenerator {
    schedules: Arc<dyn ScheduleStore>,
    slots: Arc<dyn SlotStore>,
    granularity: TimeDelta,
    horizon_days: u32,
    timeout: Duration,
}

impl SlotGenerator {
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        slots: Arc<dyn SlotStore>,
        config: &BookingConfig,
    ) -> Self {
        Self {
            schedules,
            slots,
            granularity: config.granularity(),
            horizon_days: config.slot_horizon_days,
            timeout: config.store_timeout(),
        }
    }

    pub async fn generate_slots(&self, now: DateTime<Utc>) -> TimelineResult<GenerationReport> {
        let schedules =
            with_deadline(self.timeout, "all_schedules", self.schedules.all_schedules()).await?;

        let mut report = GenerationReport {
            schedules: schedules.len(),
            ..Default::default()
        };

        let mut drafts = Vec::new();
        for schedule in &schedules {
            if let Err(err) = schedule.validate() {
                warn!(
                    schedule_id = %schedule.schedule_id,
                    worker_id = %schedule.worker_id,
                    error = %err,
                    "skipping malformed schedule"
                );
                report.skipped += 1;
                continue;
            }
            drafts.extend(expand_schedule(
                schedule,
                now.date_naive(),
                self.horizon_days,
                self.granularity,
                now,
            ));
        }
        report.drafted = drafts.len();

        for chunk in drafts.chunks(INSERT_CHUNK) {
            report.inserted +=
                with_deadline(self.timeout, "insert_slots", self.slots.insert_slots(chunk)).await?;
        }

        info!(
            schedules = report.schedules,
            skipped = report.skipped,
            drafted = report.drafted,
            inserted = report.inserted,
            "slot generation finished"
        );
        Ok(report)
    }
}
