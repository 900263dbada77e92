use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{TimelineError, TimelineResult};

/// A pause inside a working window during which no slot may be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Recurring weekly availability of one worker.
///
/// `weekday` uses ISO numbering: 1 is Monday, 7 is Sunday. A worker has at
/// most one entry per weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSchedule {
    pub schedule_id: Uuid,
    pub worker_id: Uuid,
    pub org_id: Uuid,
    pub weekday: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub break_window: Option<BreakWindow>,
}

impl WorkerSchedule {
    /// Checks the entry can produce slots.
    pub fn validate(&self) -> TimelineResult<()> {
        validate_window(self.weekday, self.start, self.end, self.break_window)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub worker_id: Uuid,
    pub weekday: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub break_window: Option<BreakWindow>,
}

impl CreateScheduleRequest {
    pub fn into_schedule(self, org_id: Uuid) -> TimelineResult<WorkerSchedule> {
        let schedule = WorkerSchedule {
            schedule_id: Uuid::new_v4(),
            worker_id: self.worker_id,
            org_id,
            weekday: self.weekday,
            start: self.start,
            end: self.end,
            break_window: self.break_window,
        };
        schedule.validate()?;
        Ok(schedule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub weekday: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub break_window: Option<BreakWindow>,
}

impl UpdateScheduleRequest {
    /// Applies the update on top of an existing entry, keeping its identity.
    pub fn apply(self, current: WorkerSchedule) -> TimelineResult<WorkerSchedule> {
        let schedule = WorkerSchedule {
            weekday: self.weekday,
            start: self.start,
            end: self.end,
            break_window: self.break_window,
            ..current
        };
        schedule.validate()?;
        Ok(schedule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub org_id: Uuid,
    pub schedules: Vec<WorkerSchedule>,
}

fn validate_window(
    weekday: u8,
    start: NaiveTime,
    end: NaiveTime,
    break_window: Option<BreakWindow>,
) -> TimelineResult<()> {
    if !(1..=7).contains(&weekday) {
        return Err(TimelineError::Validation(format!(
            "weekday must be between 1 and 7, got {}",
            weekday
        )));
    }
    if end <= start {
        return Err(TimelineError::Validation(format!(
            "schedule end {} must be after start {}",
            end, start
        )));
    }
    if let Some(pause) = break_window {
        if pause.end <= pause.start {
            return Err(TimelineError::Validation(format!(
                "break end {} must be after break start {}",
                pause.end, pause.start
            )));
        }
        if pause.start < start || pause.end > end {
            return Err(TimelineError::Validation(
                "break must lie inside the working window".to_string(),
            ));
        }
    }
    Ok(())
}
