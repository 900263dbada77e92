use crate::{
    models::{DbService, DbWorker},
    repositories::db_error,
};
use eyre::WrapErr;
use sqlx::{Pool, Postgres};
use timeline_core::{
    errors::{TimelineError, TimelineResult},
    models::catalog::{Service, Worker},
};
use tracing::debug;
use uuid::Uuid;

const SERVICE_COLUMNS: &str = "service_id, org_id, name, cost, description";

fn service_not_found(service_id: Uuid) -> TimelineError {
    TimelineError::NotFound(format!("Service with ID {} not found", service_id))
}

pub async fn service_add(pool: &Pool<Postgres>, service: &Service) -> TimelineResult<Service> {
    debug!(service_id = %service.service_id, org_id = %service.org_id, "adding service");

    let row = sqlx::query_as::<_, DbService>(&format!(
        r#"
        INSERT INTO services ({SERVICE_COLUMNS})
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {SERVICE_COLUMNS}
        "#
    ))
    .bind(service.service_id)
    .bind(service.org_id)
    .bind(&service.name)
    .bind(service.cost)
    .bind(&service.description)
    .fetch_one(pool)
    .await
    .map_err(|e| db_error(e, "failed to add service"))?;

    Ok(row.into())
}

pub async fn service_update(pool: &Pool<Postgres>, service: &Service) -> TimelineResult<Service> {
    let row = sqlx::query_as::<_, DbService>(&format!(
        r#"
        UPDATE services
        SET name = $3, cost = $4, description = $5
        WHERE service_id = $1 AND org_id = $2
        RETURNING {SERVICE_COLUMNS}
        "#
    ))
    .bind(service.service_id)
    .bind(service.org_id)
    .bind(&service.name)
    .bind(service.cost)
    .bind(&service.description)
    .fetch_optional(pool)
    .await
    .map_err(|e| db_error(e, "failed to update service"))?;

    row.map(Into::into)
        .ok_or_else(|| service_not_found(service.service_id))
}

pub async fn service_by_id(
    pool: &Pool<Postgres>,
    org_id: Uuid,
    service_id: Uuid,
) -> TimelineResult<Service> {
    let row = sqlx::query_as::<_, DbService>(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services WHERE service_id = $1 AND org_id = $2"
    ))
    .bind(service_id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
    .wrap_err("failed to get service by id")?;

    row.map(Into::into).ok_or_else(|| service_not_found(service_id))
}

pub async fn service_list(pool: &Pool<Postgres>, org_id: Uuid) -> TimelineResult<Vec<Service>> {
    let rows = sqlx::query_as::<_, DbService>(&format!(
        r#"
        SELECT {SERVICE_COLUMNS}
        FROM services
        WHERE org_id = $1
        ORDER BY name ASC
        "#
    ))
    .bind(org_id)
    .fetch_all(pool)
    .await
    .wrap_err("failed to list services")?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Records of the service cascade away; their slots are freed in the same
/// statement.
pub async fn service_delete(
    pool: &Pool<Postgres>,
    org_id: Uuid,
    service_id: Uuid,
) -> TimelineResult<()> {
    let removed: i64 = sqlx::query_scalar(
        r#"
        WITH removed AS (
            DELETE FROM services
            WHERE service_id = $1 AND org_id = $2
            RETURNING service_id
        ), released AS (
            UPDATE slots SET busy = FALSE
            WHERE slot_id IN (
                SELECT r.slot_id FROM records r
                JOIN removed ON removed.service_id = r.service_id
            )
        )
        SELECT COUNT(*) FROM removed
        "#,
    )
    .bind(service_id)
    .bind(org_id)
    .fetch_one(pool)
    .await
    .wrap_err("failed to delete service")?;

    if removed == 0 {
        return Err(service_not_found(service_id));
    }
    Ok(())
}

pub async fn service_worker_list(
    pool: &Pool<Postgres>,
    org_id: Uuid,
    service_id: Uuid,
) -> TimelineResult<Vec<Worker>> {
    service_by_id(pool, org_id, service_id).await?;

    let rows = sqlx::query_as::<_, DbWorker>(
        r#"
        SELECT w.worker_id, w.org_id, w.first_name, w.last_name, w.position, w.degree
        FROM workers w
        JOIN worker_services ws ON ws.worker_id = w.worker_id
        WHERE ws.service_id = $1
        ORDER BY w.last_name ASC, w.first_name ASC
        "#,
    )
    .bind(service_id)
    .fetch_all(pool)
    .await
    .wrap_err("failed to list service workers")?;

    Ok(rows.into_iter().map(Into::into).collect())
}
