use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use timeline_core::services::{GenerationReport, ReminderReport, SweepReport};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_generate_slots_twice() {
    let ctx = TestContext::new().await;
    // Every weekday, so the horizon always contains matching days.
    for weekday in 1..=7 {
        ctx.server
            .post(&format!("/api/orgs/{}/schedules", ctx.org_id))
            .json(&json!({
                "worker_id": ctx.worker_id,
                "weekday": weekday,
                "start": "00:00:00",
                "end": "23:30:00",
                "break_window": null,
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let first: GenerationReport = ctx.server.post("/api/admin/slots/generate").await.json();
    assert_eq!(first.schedules, 7);
    assert!(first.inserted > 0);

    let second: GenerationReport = ctx.server.post("/api/admin/slots/generate").await.json();
    assert_eq!(second.inserted, 0);
}

#[tokio::test]
async fn test_sweep_reports_every_step() {
    let ctx = TestContext::new().await;

    let report: SweepReport = ctx.server.post("/api/admin/sweep").await.json();

    assert!(report.is_complete());
    assert_eq!(report.slots, Some(0));
}

#[tokio::test]
async fn test_send_reminders() {
    let ctx = TestContext::new().await;
    ctx.server.post("/api/records").json(&ctx.booking_body()).await;

    let report: ReminderReport = ctx.server.post("/api/admin/reminders").await.json();

    assert_eq!(report.found, 1);
    assert_eq!(report.sent, 1);
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;

    let body: serde_json::Value = ctx.server.get("/health").await.json();

    assert_eq!(body["status"], "ok");
}
