use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use timeline_core::models::schedule::{ScheduleListResponse, WorkerSchedule};
use uuid::Uuid;

use crate::test_utils::TestContext;

fn monday_morning(worker_id: Uuid) -> serde_json::Value {
    json!({
        "worker_id": worker_id,
        "weekday": 1,
        "start": "09:00:00",
        "end": "12:00:00",
        "break_window": { "start": "10:00:00", "end": "10:30:00" },
    })
}

#[tokio::test]
async fn test_create_schedule() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post(&format!("/api/orgs/{}/schedules", ctx.org_id))
        .json(&monday_morning(ctx.worker_id))
        .await;

    response.assert_status(StatusCode::CREATED);
    let schedule: WorkerSchedule = response.json();
    assert_eq!(schedule.org_id, ctx.org_id);
    assert_eq!(schedule.worker_id, ctx.worker_id);
    assert_eq!(schedule.weekday, 1);
    assert!(schedule.break_window.is_some());
}

#[tokio::test]
async fn test_create_schedule_invalid_window() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post(&format!("/api/orgs/{}/schedules", ctx.org_id))
        .json(&json!({
            "worker_id": ctx.worker_id,
            "weekday": 1,
            "start": "12:00:00",
            "end": "09:00:00",
            "break_window": null,
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn test_create_duplicate_weekday() {
    let ctx = TestContext::new().await;
    let path = format!("/api/orgs/{}/schedules", ctx.org_id);

    ctx.server.post(&path).json(&monday_morning(ctx.worker_id)).await;
    let response = ctx
        .server
        .post(&path)
        .json(&monday_morning(ctx.worker_id))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_schedules_by_worker() {
    let ctx = TestContext::new().await;
    let path = format!("/api/orgs/{}/schedules", ctx.org_id);
    ctx.server.post(&path).json(&monday_morning(ctx.worker_id)).await;
    ctx.server.post(&path).json(&monday_morning(Uuid::new_v4())).await;

    let all: ScheduleListResponse = ctx.server.get(&path).await.json();
    assert_eq!(all.org_id, ctx.org_id);
    assert_eq!(all.schedules.len(), 2);

    let mine: ScheduleListResponse = ctx
        .server
        .get(&path)
        .add_query_param("worker_id", ctx.worker_id)
        .await
        .json();
    assert_eq!(mine.schedules.len(), 1);
    assert_eq!(mine.schedules[0].worker_id, ctx.worker_id);
}

#[tokio::test]
async fn test_update_and_delete_schedule() {
    let ctx = TestContext::new().await;
    let created: WorkerSchedule = ctx
        .server
        .post(&format!("/api/orgs/{}/schedules", ctx.org_id))
        .json(&monday_morning(ctx.worker_id))
        .await
        .json();

    let updated: WorkerSchedule = ctx
        .server
        .put(&format!("/api/schedules/{}", created.schedule_id))
        .json(&json!({
            "weekday": 3,
            "start": "13:00:00",
            "end": "18:00:00",
            "break_window": null,
        }))
        .await
        .json();
    assert_eq!(updated.schedule_id, created.schedule_id);
    assert_eq!(updated.weekday, 3);
    assert_eq!(updated.break_window, None);

    ctx.server
        .delete(&format!("/api/schedules/{}", created.schedule_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    ctx.server
        .delete(&format!("/api/schedules/{}", created.schedule_id))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_schedule() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .put(&format!("/api/schedules/{}", Uuid::new_v4()))
        .json(&json!({
            "weekday": 2,
            "start": "09:00:00",
            "end": "10:00:00",
            "break_window": null,
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
