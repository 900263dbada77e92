use axum::{http::StatusCode, response::IntoResponse};
use pretty_assertions::assert_eq;
use rstest::rstest;
use timeline_api::middleware::error_handling::AppError;
use timeline_core::errors::TimelineError;
use uuid::Uuid;

#[rstest]
#[case::not_found(TimelineError::NotFound("record".to_string()), StatusCode::NOT_FOUND)]
#[case::validation(TimelineError::Validation("rating".to_string()), StatusCode::BAD_REQUEST)]
#[case::conflict(TimelineError::Conflict("feedback".to_string()), StatusCode::CONFLICT)]
#[case::slot_unavailable(
    TimelineError::SlotUnavailable { slot_id: Uuid::nil() },
    StatusCode::CONFLICT
)]
#[case::timeout(TimelineError::Timeout("record_add".to_string()), StatusCode::GATEWAY_TIMEOUT)]
#[case::database(
    TimelineError::Database(eyre::eyre!("connection refused")),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status(#[case] error: TimelineError, #[case] expected: StatusCode) {
    let response = AppError(error).into_response();

    assert_eq!(response.status(), expected);
}

#[test]
fn test_eyre_report_is_server_error() {
    let error: AppError = eyre::eyre!("pool closed").into();

    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
