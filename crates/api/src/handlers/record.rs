use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use timeline_core::models::record::{
    Feedback, FeedbackRequest, NewRecord, PatchRecordRequest, Record, RecordList,
    RecordListParams, RecordPatch,
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_record(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<NewRecord>,
) -> Result<(StatusCode, Json<Record>), AppError> {
    let record = state.records.record_add(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[axum::debug_handler]
pub async fn list_records(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<RecordListParams>,
) -> Result<Json<RecordList>, AppError> {
    let list = state.records.record_list(&params).await?;
    Ok(Json(list))
}

#[axum::debug_handler]
pub async fn get_record(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Record>, AppError> {
    let record = state.records.record(id).await?;
    Ok(Json(record))
}

#[axum::debug_handler]
pub async fn patch_record(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PatchRecordRequest>,
) -> Result<Json<Record>, AppError> {
    let record = state
        .records
        .record_patch(RecordPatch {
            record_id: id,
            reviewed: payload.reviewed,
        })
        .await?;
    Ok(Json(record))
}

#[axum::debug_handler]
pub async fn delete_record(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.records.record_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn add_feedback(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    let feedback = Feedback {
        record_id: id,
        rating: payload.rating,
        comment: payload.comment,
    };
    let stored = state.records.feedback_add(feedback, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

#[axum::debug_handler]
pub async fn get_feedback(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Feedback>, AppError> {
    let feedback = state.records.feedback(id).await?;
    Ok(Json(feedback))
}
