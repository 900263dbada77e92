use axum::{Router, routing::post};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/slots/generate", post(handlers::admin::generate_slots))
        .route("/api/admin/sweep", post(handlers::admin::sweep))
        .route("/api/admin/reminders", post(handlers::admin::send_reminders))
}
