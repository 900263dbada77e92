use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/records",
            get(handlers::record::list_records).post(handlers::record::create_record),
        )
        .route(
            "/api/records/:id",
            get(handlers::record::get_record)
                .patch(handlers::record::patch_record)
                .delete(handlers::record::delete_record),
        )
        .route(
            "/api/records/:id/feedback",
            post(handlers::record::add_feedback).get(handlers::record::get_feedback),
        )
}
