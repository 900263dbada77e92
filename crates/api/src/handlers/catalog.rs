use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use timeline_core::models::catalog::{Service, ServiceRequest, Worker, WorkerRequest};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub org_id: Uuid,
    pub services: Vec<Service>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkerListResponse {
    pub org_id: Uuid,
    pub workers: Vec<Worker>,
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let service = state.catalog.service_add(org_id, payload).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<ApiState>>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<ServiceListResponse>, AppError> {
    let services = state.catalog.service_list(org_id).await?;
    Ok(Json(ServiceListResponse { org_id, services }))
}

#[axum::debug_handler]
pub async fn get_service(
    State(state): State<Arc<ApiState>>,
    Path((org_id, service_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Service>, AppError> {
    let service = state.catalog.service(org_id, service_id).await?;
    Ok(Json(service))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<ApiState>>,
    Path((org_id, service_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let service = state
        .catalog
        .service_update(org_id, service_id, payload)
        .await?;
    Ok(Json(service))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<Arc<ApiState>>,
    Path((org_id, service_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.catalog.service_delete(org_id, service_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_service_workers(
    State(state): State<Arc<ApiState>>,
    Path((org_id, service_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<WorkerListResponse>, AppError> {
    let workers = state.catalog.service_worker_list(org_id, service_id).await?;
    Ok(Json(WorkerListResponse { org_id, workers }))
}

#[axum::debug_handler]
pub async fn create_worker(
    State(state): State<Arc<ApiState>>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<WorkerRequest>,
) -> Result<(StatusCode, Json<Worker>), AppError> {
    let worker = state.catalog.worker_add(org_id, payload).await?;
    Ok((StatusCode::CREATED, Json(worker)))
}

#[axum::debug_handler]
pub async fn list_workers(
    State(state): State<Arc<ApiState>>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<WorkerListResponse>, AppError> {
    let workers = state.catalog.worker_list(org_id).await?;
    Ok(Json(WorkerListResponse { org_id, workers }))
}

#[axum::debug_handler]
pub async fn get_worker(
    State(state): State<Arc<ApiState>>,
    Path((org_id, worker_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Worker>, AppError> {
    let worker = state.catalog.worker(org_id, worker_id).await?;
    Ok(Json(worker))
}

#[axum::debug_handler]
pub async fn delete_worker(
    State(state): State<Arc<ApiState>>,
    Path((org_id, worker_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.catalog.worker_delete(org_id, worker_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn assign_service(
    State(state): State<Arc<ApiState>>,
    Path((org_id, worker_id, service_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .catalog
        .worker_assign_service(org_id, worker_id, service_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
