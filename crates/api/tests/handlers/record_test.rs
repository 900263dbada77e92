use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use timeline_core::models::record::{Record, RecordList};
use timeline_core::repositories::SlotStore;
use uuid::Uuid;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_create_record() {
    let ctx = TestContext::new().await;

    let response = ctx.server.post("/api/records").json(&ctx.booking_body()).await;

    response.assert_status(StatusCode::CREATED);
    let record: Record = response.json();
    assert_eq!(record.slot_id, ctx.slot.slot_id);
    assert_eq!(record.user_id, ctx.user_id);
    assert!(!record.reviewed);
    assert!(ctx.store.slot(ctx.slot.slot_id).await.unwrap().busy);
}

#[tokio::test]
async fn test_double_booking_reports_slot_unavailable() {
    let ctx = TestContext::new().await;
    ctx.server.post("/api/records").json(&ctx.booking_body()).await;

    let response = ctx
        .server
        .post("/api/records")
        .json(&ctx.booking_body())
        .expect_failure()
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "slot_unavailable");
    assert_eq!(ctx.store.record_count().await, 1);
}

#[tokio::test]
async fn test_released_slot_with_record_reports_slot_unavailable() {
    let ctx = TestContext::new().await;
    ctx.server.post("/api/records").json(&ctx.booking_body()).await;
    ctx.server
        .put(&format!("/api/slots/{}", ctx.slot.slot_id))
        .json(&json!({ "busy": false }))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .post("/api/records")
        .json(&ctx.booking_body())
        .expect_failure()
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "slot_unavailable");
    assert_eq!(ctx.store.record_count().await, 1);
}

#[tokio::test]
async fn test_get_patch_delete_record() {
    let ctx = TestContext::new().await;
    let created: Record = ctx
        .server
        .post("/api/records")
        .json(&ctx.booking_body())
        .await
        .json();
    let path = format!("/api/records/{}", created.record_id);

    let fetched: Record = ctx.server.get(&path).await.json();
    assert_eq!(fetched, created);

    let patched: Record = ctx
        .server
        .patch(&path)
        .json(&json!({ "reviewed": true }))
        .await
        .json();
    assert!(patched.reviewed);

    ctx.server
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(!ctx.store.slot(ctx.slot.slot_id).await.unwrap().busy);

    ctx.server
        .get(&path)
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_records_for_user() {
    let ctx = TestContext::new().await;
    ctx.server.post("/api/records").json(&ctx.booking_body()).await;

    let list: RecordList = ctx
        .server
        .get("/api/records")
        .add_query_param("user_id", ctx.user_id)
        .add_query_param("limit", 10)
        .await
        .json();

    assert_eq!(list.found, 1);
    assert_eq!(list.records[0].slot_id, ctx.slot.slot_id);
}

#[tokio::test]
async fn test_list_records_requires_owner() {
    let ctx = TestContext::new().await;

    ctx.server
        .get("/api/records")
        .expect_failure()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_before_appointment_rejected() {
    let ctx = TestContext::new().await;
    let created: Record = ctx
        .server
        .post("/api/records")
        .json(&ctx.booking_body())
        .await
        .json();

    let response = ctx
        .server
        .post(&format!("/api/records/{}/feedback", created.record_id))
        .json(&json!({ "rating": 5, "comment": "Lovely" }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_rating_out_of_range() {
    let ctx = TestContext::new().await;

    ctx.server
        .post(&format!("/api/records/{}/feedback", Uuid::new_v4()))
        .json(&json!({ "rating": 0 }))
        .expect_failure()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_feedback() {
    let ctx = TestContext::new().await;

    ctx.server
        .get(&format!("/api/records/{}/feedback", Uuid::new_v4()))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
