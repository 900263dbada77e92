use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{TimelineError, TimelineResult};

/// A confirmed booking of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub record_id: Uuid,
    pub org_id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub service_id: Uuid,
    pub worker_id: Uuid,
    pub reviewed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub org_id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub service_id: Uuid,
    pub worker_id: Uuid,
}

/// Mutable record fields. Slot state is never touched by a patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPatch {
    pub record_id: Uuid,
    pub reviewed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchRecordRequest {
    pub reviewed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordListParams {
    pub org_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub reviewed: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

impl RecordListParams {
    pub fn validate(&self) -> TimelineResult<()> {
        if self.org_id.is_none() && self.user_id.is_none() {
            return Err(TimelineError::Validation(
                "either org_id or user_id is required".to_string(),
            ));
        }
        if self.limit <= 0 || self.offset < 0 {
            return Err(TimelineError::Validation(
                "limit must be positive and offset non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordList {
    pub records: Vec<Record>,
    pub found: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub record_id: Uuid,
    pub rating: u8,
    pub comment: String,
}

impl Feedback {
    pub fn validate(&self) -> TimelineResult<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(TimelineError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                self.rating
            )));
        }
        if self.comment.chars().count() > 1500 {
            return Err(TimelineError::Validation(
                "comment is longer than 1500 characters".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// Everything a reminder needs about one booked record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub record: Record,
    pub user_email: String,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
}
