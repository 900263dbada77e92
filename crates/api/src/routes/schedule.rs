use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/orgs/:org_id/schedules",
            get(handlers::schedule::list_schedules).post(handlers::schedule::create_schedule),
        )
        .route(
            "/api/schedules/:id",
            put(handlers::schedule::update_schedule).delete(handlers::schedule::delete_schedule),
        )
}
