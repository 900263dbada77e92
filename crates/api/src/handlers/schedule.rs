use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use timeline_core::models::schedule::{
    CreateScheduleRequest, ScheduleListResponse, UpdateScheduleRequest, WorkerSchedule,
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub worker_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<ApiState>>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<WorkerSchedule>), AppError> {
    let schedule = state.availability.schedule_add(org_id, payload).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[axum::debug_handler]
pub async fn list_schedules(
    State(state): State<Arc<ApiState>>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<ScheduleListResponse>, AppError> {
    let schedules = state.availability.schedules(org_id, query.worker_id).await?;
    Ok(Json(ScheduleListResponse { org_id, schedules }))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<Json<WorkerSchedule>, AppError> {
    let schedule = state.availability.schedule_update(id, payload).await?;
    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.availability.schedule_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
