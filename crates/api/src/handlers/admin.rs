//! Manual triggers for the periodic jobs. The scheduler binary runs the
//! same operations on a timer.

use axum::{Json, extract::State};
use chrono::Utc;
use std::sync::Arc;
use timeline_core::services::{GenerationReport, ReminderReport, SweepReport};

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn generate_slots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<GenerationReport>, AppError> {
    let report = state.generator.generate_slots(Utc::now()).await?;
    Ok(Json(report))
}

#[axum::debug_handler]
pub async fn sweep(State(state): State<Arc<ApiState>>) -> Json<SweepReport> {
    Json(state.sweeper.sweep(Utc::now()).await)
}

#[axum::debug_handler]
pub async fn send_reminders(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ReminderReport>, AppError> {
    let report = state.records.send_reminders(Utc::now()).await?;
    Ok(Json(report))
}
