use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timeline_core::models::{
    catalog::{Service, Worker},
    record::{Feedback, Record, Reminder},
    schedule::{BreakWindow, WorkerSchedule},
    slot::Slot,
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSchedule {
    pub schedule_id: Uuid,
    pub worker_id: Uuid,
    pub org_id: Uuid,
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
}

impl From<DbSchedule> for WorkerSchedule {
    fn from(row: DbSchedule) -> Self {
        let break_window = match (row.break_start, row.break_end) {
            (Some(start), Some(end)) => Some(BreakWindow { start, end }),
            _ => None,
        };
        Self {
            schedule_id: row.schedule_id,
            worker_id: row.worker_id,
            org_id: row.org_id,
            // An out-of-range weekday fails validation and is skipped later.
            weekday: u8::try_from(row.weekday).unwrap_or(0),
            start: row.start_time,
            end: row.end_time,
            break_window,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub slot_id: Uuid,
    pub worker_id: Uuid,
    pub org_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub busy: bool,
}

impl From<DbSlot> for Slot {
    fn from(row: DbSlot) -> Self {
        Self {
            slot_id: row.slot_id,
            worker_id: row.worker_id,
            org_id: row.org_id,
            start: row.start_time,
            end: row.end_time,
            busy: row.busy,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRecord {
    pub record_id: Uuid,
    pub org_id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub service_id: Uuid,
    pub worker_id: Uuid,
    pub reviewed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbRecord> for Record {
    fn from(row: DbRecord) -> Self {
        Self {
            record_id: row.record_id,
            org_id: row.org_id,
            user_id: row.user_id,
            slot_id: row.slot_id,
            service_id: row.service_id,
            worker_id: row.worker_id,
            reviewed: row.reviewed,
            created_at: row.created_at,
        }
    }
}

/// A record joined with its slot times and the booking user's address.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReminder {
    #[sqlx(flatten)]
    pub record: DbRecord,
    pub user_email: String,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
}

impl From<DbReminder> for Reminder {
    fn from(row: DbReminder) -> Self {
        Self {
            record: row.record.into(),
            user_email: row.user_email,
            slot_start: row.slot_start,
            slot_end: row.slot_end,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFeedback {
    pub record_id: Uuid,
    pub rating: i16,
    pub comment: String,
}

impl From<DbFeedback> for Feedback {
    fn from(row: DbFeedback) -> Self {
        Self {
            record_id: row.record_id,
            rating: u8::try_from(row.rating).unwrap_or_default(),
            comment: row.comment,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub service_id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub cost: i64,
    pub description: String,
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Self {
            service_id: row.service_id,
            org_id: row.org_id,
            name: row.name,
            cost: row.cost,
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWorker {
    pub worker_id: Uuid,
    pub org_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub degree: String,
}

impl From<DbWorker> for Worker {
    fn from(row: DbWorker) -> Self {
        Self {
            worker_id: row.worker_id,
            org_id: row.org_id,
            first_name: row.first_name,
            last_name: row.last_name,
            position: row.position,
            degree: row.degree,
        }
    }
}
