use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use timeline_api::handlers::catalog::{ServiceListResponse, WorkerListResponse};
use timeline_core::{
    models::catalog::{Service, Worker},
    repositories::SlotStore,
};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_create_and_list_services() {
    let ctx = TestContext::new().await;
    let path = format!("/api/orgs/{}/services", ctx.org_id);

    let response = ctx
        .server
        .post(&path)
        .json(&json!({ "name": "Beard trim", "cost": 1500 }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: Service = response.json();
    assert_eq!(created.org_id, ctx.org_id);
    assert_eq!(created.description, "");

    let listed: ServiceListResponse = ctx.server.get(&path).await.json();
    assert_eq!(listed.services.len(), 2);
    assert_eq!(listed.services[0], created);
}

#[tokio::test]
async fn test_create_service_negative_cost() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post(&format!("/api/orgs/{}/services", ctx.org_id))
        .json(&json!({ "name": "Refund", "cost": -100 }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn test_update_and_get_service() {
    let ctx = TestContext::new().await;
    let path = format!("/api/orgs/{}/services/{}", ctx.org_id, ctx.service_id);

    let updated: Service = ctx
        .server
        .put(&path)
        .json(&json!({ "name": "Haircut", "cost": 3000, "description": "With styling" }))
        .await
        .json();
    assert_eq!(updated.cost, 3000);

    let fetched: Service = ctx.server.get(&path).await.json();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_service_of_other_org_not_found() {
    let ctx = TestContext::new().await;

    ctx.server
        .get(&format!("/api/orgs/{}/services/{}", Uuid::new_v4(), ctx.service_id))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_service_frees_booked_slot() {
    let ctx = TestContext::new().await;
    ctx.server
        .post("/api/records")
        .json(&ctx.booking_body())
        .await
        .assert_status(StatusCode::CREATED);

    ctx.server
        .delete(&format!("/api/orgs/{}/services/{}", ctx.org_id, ctx.service_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert_eq!(ctx.store.record_count().await, 0);
    assert!(!ctx.store.slot(ctx.slot.slot_id).await.unwrap().busy);
}

#[tokio::test]
async fn test_workers_assigned_to_service() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post(&format!("/api/orgs/{}/workers", ctx.org_id))
        .json(&json!({ "first_name": "Grace", "last_name": "Hopper", "position": "Colorist" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let grace: Worker = response.json();

    ctx.server
        .put(&format!(
            "/api/orgs/{}/workers/{}/services/{}",
            ctx.org_id, grace.worker_id, ctx.service_id
        ))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let assigned: WorkerListResponse = ctx
        .server
        .get(&format!(
            "/api/orgs/{}/services/{}/workers",
            ctx.org_id, ctx.service_id
        ))
        .await
        .json();
    assert_eq!(assigned.workers, vec![grace]);

    let all: WorkerListResponse = ctx
        .server
        .get(&format!("/api/orgs/{}/workers", ctx.org_id))
        .await
        .json();
    assert_eq!(all.workers.len(), 2);
}

#[tokio::test]
async fn test_assign_unknown_service_not_found() {
    let ctx = TestContext::new().await;

    ctx.server
        .put(&format!(
            "/api/orgs/{}/workers/{}/services/{}",
            ctx.org_id,
            ctx.worker_id,
            Uuid::new_v4()
        ))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_and_delete_worker() {
    let ctx = TestContext::new().await;
    let path = format!("/api/orgs/{}/workers/{}", ctx.org_id, ctx.worker_id);

    let worker: Worker = ctx.server.get(&path).await.json();
    assert_eq!(worker.last_name, "Byron");

    ctx.server
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert_eq!(ctx.store.slot_count().await, 0);
    ctx.server
        .get(&path)
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
