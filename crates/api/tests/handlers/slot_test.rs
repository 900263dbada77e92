use axum::http::StatusCode;
use chrono::{TimeDelta, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use timeline_core::models::slot::{Slot, SlotListResponse};
use uuid::Uuid;

use crate::test_utils::{TestContext, query_time};

#[tokio::test]
async fn test_list_slots_in_range() {
    let ctx = TestContext::new().await;
    let from = Utc::now();
    let to = from + TimeDelta::days(1);

    let response = ctx
        .server
        .get(&format!("/api/workers/{}/slots", ctx.worker_id))
        .add_query_param("from", query_time(from))
        .add_query_param("to", query_time(to))
        .await;

    response.assert_status_ok();
    let listed: SlotListResponse = response.json();
    assert_eq!(listed.worker_id, ctx.worker_id);
    assert_eq!(listed.slots, vec![ctx.slot.clone()]);
}

#[tokio::test]
async fn test_list_slots_inverted_range() {
    let ctx = TestContext::new().await;
    let from = Utc::now();

    let response = ctx
        .server
        .get(&format!("/api/workers/{}/slots", ctx.worker_id))
        .add_query_param("from", query_time(from))
        .add_query_param("to", query_time(from - TimeDelta::hours(1)))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_claim_and_release_slot() {
    let ctx = TestContext::new().await;
    let path = format!("/api/slots/{}", ctx.slot.slot_id);

    let claimed: Slot = ctx.server.put(&path).json(&json!({ "busy": true })).await.json();
    assert!(claimed.busy);

    let again = ctx
        .server
        .put(&path)
        .json(&json!({ "busy": true }))
        .expect_failure()
        .await;
    again.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = again.json();
    assert_eq!(body["code"], "slot_unavailable");

    let released: Slot = ctx.server.put(&path).json(&json!({ "busy": false })).await.json();
    assert!(!released.busy);
}

#[tokio::test]
async fn test_update_unknown_slot() {
    let ctx = TestContext::new().await;

    ctx.server
        .put(&format!("/api/slots/{}", Uuid::new_v4()))
        .json(&json!({ "busy": true }))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
