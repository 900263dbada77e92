use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;
use timeline_core::models::slot::{Slot, SlotListResponse, SlotRangeQuery, UpdateSlotRequest};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Path(worker_id): Path<Uuid>,
    Query(range): Query<SlotRangeQuery>,
) -> Result<Json<SlotListResponse>, AppError> {
    let slots = state
        .availability
        .slots(worker_id, range.from, range.to)
        .await?;
    Ok(Json(SlotListResponse { worker_id, slots }))
}

/// Claims (`busy: true`) or releases (`busy: false`) a slot.
#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<Json<Slot>, AppError> {
    let slot = state.availability.update_slot(id, payload.busy).await?;
    Ok(Json(slot))
}
