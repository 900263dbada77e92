use std::error::Error;
use timeline_core::errors::{TimelineError, TimelineResult};
use uuid::Uuid;

#[test]
fn test_timeline_error_display() {
    let not_found = TimelineError::NotFound("Record not found".to_string());
    let validation = TimelineError::Validation("Invalid input".to_string());
    let conflict = TimelineError::Conflict("Feedback already exists".to_string());
    let timeout = TimelineError::Timeout("record_add".to_string());
    let database = TimelineError::Database(eyre::eyre!("Database connection failed"));
    let internal = TimelineError::Internal(Box::new(std::io::Error::other("Internal error")));

    assert_eq!(not_found.to_string(), "Resource not found: Record not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(conflict.to_string(), "Conflict: Feedback already exists");
    assert_eq!(timeout.to_string(), "Operation timed out: record_add");
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_slot_unavailable_names_the_slot() {
    let slot_id = Uuid::new_v4();
    let error = TimelineError::SlotUnavailable { slot_id };

    assert_eq!(error.to_string(), format!("Slot {} is unavailable", slot_id));
    assert_eq!(error.code(), "slot_unavailable");
    assert!(!error.is_transient());
}

#[test]
fn test_error_codes() {
    assert_eq!(TimelineError::NotFound(String::new()).code(), "not_found");
    assert_eq!(TimelineError::Validation(String::new()).code(), "validation");
    assert_eq!(TimelineError::Conflict(String::new()).code(), "conflict");
    assert_eq!(TimelineError::Timeout(String::new()).code(), "timeout");
    assert_eq!(TimelineError::Database(eyre::eyre!("down")).code(), "database");
}

#[test]
fn test_transient_errors() {
    assert!(TimelineError::Timeout("slots".to_string()).is_transient());
    assert!(TimelineError::Database(eyre::eyre!("down")).is_transient());
    assert!(!TimelineError::NotFound("slot".to_string()).is_transient());
    assert!(!TimelineError::Validation("slot".to_string()).is_transient());
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::other("IO error");
    let error = TimelineError::Internal(Box::new(io_error));

    assert!(error.source().is_some());
}

#[test]
fn test_timeline_result() {
    let result: TimelineResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: TimelineResult<i32> = Err(TimelineError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_trait_implementation() {
    let error: TimelineError = eyre::eyre!("pool exhausted").into();

    assert!(matches!(error, TimelineError::Database(_)));
    assert!(error.to_string().contains("pool exhausted"));
}

#[test]
fn test_box_error_conversion() {
    let boxed_error: Box<dyn Error + Send + Sync> = Box::new(std::io::Error::other("IO error"));
    let error: TimelineError = boxed_error.into();

    assert!(error.to_string().contains("IO error"));
}
