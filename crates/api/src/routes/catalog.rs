use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers::catalog};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/orgs/:org_id/services",
            get(catalog::list_services).post(catalog::create_service),
        )
        .route(
            "/api/orgs/:org_id/services/:service_id",
            get(catalog::get_service)
                .put(catalog::update_service)
                .delete(catalog::delete_service),
        )
        .route(
            "/api/orgs/:org_id/services/:service_id/workers",
            get(catalog::list_service_workers),
        )
        .route(
            "/api/orgs/:org_id/workers",
            get(catalog::list_workers).post(catalog::create_worker),
        )
        .route(
            "/api/orgs/:org_id/workers/:worker_id",
            get(catalog::get_worker).delete(catalog::delete_worker),
        )
        .route(
            "/api/orgs/:org_id/workers/:worker_id/services/:service_id",
            put(catalog::assign_service),
        )
}
