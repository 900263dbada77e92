use std::{sync::Arc, time::Duration};

use tracing::info;
use uuid::Uuid;

use crate::{
    config::BookingConfig,
    errors::TimelineResult,
    models::catalog::{Service, ServiceRequest, Worker, WorkerRequest},
    repositories::{CatalogStore, WorkerStore},
    services::with_deadline,
};

/// Services and workers of an organization.
pub struct CatalogService {
    services: Arc<dyn CatalogStore>,
    workers: Arc<dyn WorkerStore>,
    timeout: Duration,
}

impl CatalogService {
    pub fn new(
        services: Arc<dyn CatalogStore>,
        workers: Arc<dyn WorkerStore>,
        config: &BookingConfig,
    ) -> Self {
        Self {
            services,
            workers,
            timeout: config.store_timeout(),
        }
    }

    pub async fn service_add(
        &self,
        org_id: Uuid,
        request: ServiceRequest,
    ) -> TimelineResult<Service> {
        let service = request.into_service(org_id, Uuid::new_v4())?;
        let stored =
            with_deadline(self.timeout, "service_add", self.services.service_add(&service))
                .await?;
        info!(service_id = %stored.service_id, org_id = %org_id, "service added");
        Ok(stored)
    }

    /// Replaces name, cost and description of an existing service.
    pub async fn service_update(
        &self,
        org_id: Uuid,
        service_id: Uuid,
        request: ServiceRequest,
    ) -> TimelineResult<Service> {
        let service = request.into_service(org_id, service_id)?;
        with_deadline(
            self.timeout,
            "service_update",
            self.services.service_update(&service),
        )
        .await
    }

    pub async fn service(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<Service> {
        with_deadline(self.timeout, "service", self.services.service(org_id, service_id)).await
    }

    pub async fn service_list(&self, org_id: Uuid) -> TimelineResult<Vec<Service>> {
        with_deadline(self.timeout, "service_list", self.services.service_list(org_id)).await
    }

    /// Removes the service. Bookings made for it are cancelled and their
    /// slots become free again.
    pub async fn service_delete(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<()> {
        with_deadline(
            self.timeout,
            "service_delete",
            self.services.service_delete(org_id, service_id),
        )
        .await?;
        info!(service_id = %service_id, org_id = %org_id, "service deleted");
        Ok(())
    }

    pub async fn service_worker_list(
        &self,
        org_id: Uuid,
        service_id: Uuid,
    ) -> TimelineResult<Vec<Worker>> {
        with_deadline(
            self.timeout,
            "service_worker_list",
            self.services.service_worker_list(org_id, service_id),
        )
        .await
    }

    pub async fn worker_add(&self, org_id: Uuid, request: WorkerRequest) -> TimelineResult<Worker> {
        let worker = request.into_worker(org_id)?;
        let stored =
            with_deadline(self.timeout, "worker_add", self.workers.worker_add(&worker)).await?;
        info!(worker_id = %stored.worker_id, org_id = %org_id, "worker added");
        Ok(stored)
    }

    pub async fn worker(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<Worker> {
        with_deadline(self.timeout, "worker", self.workers.worker(org_id, worker_id)).await
    }

    pub async fn worker_list(&self, org_id: Uuid) -> TimelineResult<Vec<Worker>> {
        with_deadline(self.timeout, "worker_list", self.workers.worker_list(org_id)).await
    }

    pub async fn worker_delete(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<()> {
        with_deadline(
            self.timeout,
            "worker_delete",
            self.workers.worker_delete(org_id, worker_id),
        )
        .await?;
        info!(worker_id = %worker_id, org_id = %org_id, "worker deleted");
        Ok(())
    }

    pub async fn worker_assign_service(
        &self,
        org_id: Uuid,
        worker_id: Uuid,
        service_id: Uuid,
    ) -> TimelineResult<()> {
        with_deadline(
            self.timeout,
            "worker_assign_service",
            self.workers
                .worker_assign_service(org_id, worker_id, service_id),
        )
        .await
    }
}
