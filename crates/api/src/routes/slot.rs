use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/workers/:worker_id/slots", get(handlers::slot::list_slots))
        .route("/api/slots/:id", put(handlers::slot::update_slot))
}
