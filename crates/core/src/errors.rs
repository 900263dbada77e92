use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A claim lost the race for a slot or the slot was already booked.
    /// Callers use this to offer a different slot.
    #[error("Slot {slot_id} is unavailable")]
    SlotUnavailable { slot_id: Uuid },

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TimelineError {
    /// Errors worth retrying: the store was unreachable or did not answer in time.
    pub fn is_transient(&self) -> bool {
        matches!(self, TimelineError::Timeout(_) | TimelineError::Database(_))
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            TimelineError::NotFound(_) => "not_found",
            TimelineError::Validation(_) => "validation",
            TimelineError::Conflict(_) => "conflict",
            TimelineError::SlotUnavailable { .. } => "slot_unavailable",
            TimelineError::Timeout(_) => "timeout",
            TimelineError::Database(_) => "database",
            TimelineError::Internal(_) => "internal",
        }
    }
}

pub type TimelineResult<T> = Result<T, TimelineError>;
