//! PostgreSQL repositories.
//!
//! Every module exposes plain async functions over a pool, the same shape
//! the handlers used before the storage traits existed. [`PgStore`] wires
//! them into the traits of `timeline-core`.

pub mod account;
pub mod record;
pub mod schedule;
pub mod service;
pub mod slot;
pub mod worker;

use std::ops::Range;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use timeline_core::{
    errors::{TimelineError, TimelineResult},
    models::{
        catalog::{Service, Worker},
        record::{Feedback, NewRecord, Record, RecordList, RecordListParams, RecordPatch, Reminder},
        schedule::WorkerSchedule,
        slot::{Slot, SlotDraft},
    },
    repositories::{
        AccountStore, CatalogStore, RecordStore, ScheduleStore, SlotStore, WorkerStore,
    },
};
use uuid::Uuid;

use crate::DbPool;

/// Maps a sqlx error into the domain taxonomy.
///
/// Constraint violations carry meaning for the caller: a unique violation is
/// a conflict, a missing foreign row means the referenced entity does not
/// exist, a failed check is invalid input. Anything else is a store failure.
pub(crate) fn db_error(err: sqlx::Error, context: &str) -> TimelineError {
    if let sqlx::Error::Database(db) = &err {
        let detail = db
            .constraint()
            .map(|constraint| format!("{}: {}", context, constraint))
            .unwrap_or_else(|| format!("{}: {}", context, db.message()));
        if db.is_unique_violation() {
            return TimelineError::Conflict(detail);
        }
        if db.is_foreign_key_violation() {
            return TimelineError::NotFound(detail);
        }
        if db.is_check_violation() {
            return TimelineError::Validation(detail);
        }
    }
    TimelineError::Database(eyre::Report::new(err).wrap_err(context.to_string()))
}

/// PostgreSQL-backed implementation of every storage trait.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn schedule_add(&self, schedule: &WorkerSchedule) -> TimelineResult<WorkerSchedule> {
        schedule::schedule_add(&self.pool, schedule).await
    }

    async fn schedule(&self, schedule_id: Uuid) -> TimelineResult<WorkerSchedule> {
        schedule::schedule_by_id(&self.pool, schedule_id).await
    }

    async fn schedule_update(&self, schedule: &WorkerSchedule) -> TimelineResult<WorkerSchedule> {
        schedule::schedule_update(&self.pool, schedule).await
    }

    async fn schedule_delete(&self, schedule_id: Uuid) -> TimelineResult<()> {
        schedule::schedule_delete(&self.pool, schedule_id).await
    }

    async fn schedules(
        &self,
        org_id: Uuid,
        worker_id: Option<Uuid>,
    ) -> TimelineResult<Vec<WorkerSchedule>> {
        schedule::schedules(&self.pool, org_id, worker_id).await
    }

    async fn all_schedules(&self) -> TimelineResult<Vec<WorkerSchedule>> {
        schedule::all_schedules(&self.pool).await
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn service_add(&self, service: &Service) -> TimelineResult<Service> {
        service::service_add(&self.pool, service).await
    }

    async fn service_update(&self, service: &Service) -> TimelineResult<Service> {
        service::service_update(&self.pool, service).await
    }

    async fn service(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<Service> {
        service::service_by_id(&self.pool, org_id, service_id).await
    }

    async fn service_list(&self, org_id: Uuid) -> TimelineResult<Vec<Service>> {
        service::service_list(&self.pool, org_id).await
    }

    async fn service_delete(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<()> {
        service::service_delete(&self.pool, org_id, service_id).await
    }

    async fn service_worker_list(
        &self,
        org_id: Uuid,
        service_id: Uuid,
    ) -> TimelineResult<Vec<Worker>> {
        service::service_worker_list(&self.pool, org_id, service_id).await
    }
}

#[async_trait]
impl WorkerStore for PgStore {
    async fn worker_add(&self, worker: &Worker) -> TimelineResult<Worker> {
        worker::worker_add(&self.pool, worker).await
    }

    async fn worker(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<Worker> {
        worker::worker_by_id(&self.pool, org_id, worker_id).await
    }

    async fn worker_list(&self, org_id: Uuid) -> TimelineResult<Vec<Worker>> {
        worker::worker_list(&self.pool, org_id).await
    }

    async fn worker_delete(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<()> {
        worker::worker_delete(&self.pool, org_id, worker_id).await
    }

    async fn worker_assign_service(
        &self,
        org_id: Uuid,
        worker_id: Uuid,
        service_id: Uuid,
    ) -> TimelineResult<()> {
        worker::worker_assign_service(&self.pool, org_id, worker_id, service_id).await
    }
}

#[async_trait]
impl SlotStore for PgStore {
    async fn insert_slots(&self, drafts: &[SlotDraft]) -> TimelineResult<u64> {
        slot::insert_slots(&self.pool, drafts).await
    }

    async fn slot(&self, slot_id: Uuid) -> TimelineResult<Slot> {
        slot::slot_by_id(&self.pool, slot_id).await
    }

    async fn slots(
        &self,
        worker_id: Uuid,
        range: Range<DateTime<Utc>>,
    ) -> TimelineResult<Vec<Slot>> {
        slot::slots(&self.pool, worker_id, range).await
    }

    async fn update_slot(&self, slot_id: Uuid, busy: bool) -> TimelineResult<()> {
        slot::update_slot(&self.pool, slot_id, busy).await
    }

    async fn delete_expired_slots(&self, now: DateTime<Utc>) -> TimelineResult<u64> {
        slot::delete_expired_slots(&self.pool, now).await
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn record(&self, record_id: Uuid) -> TimelineResult<Record> {
        record::record_by_id(&self.pool, record_id).await
    }

    async fn record_list(&self, params: &RecordListParams) -> TimelineResult<RecordList> {
        record::record_list(&self.pool, params).await
    }

    async fn record_add(&self, new_record: &NewRecord) -> TimelineResult<Reminder> {
        record::record_add(&self.pool, new_record).await
    }

    async fn record_patch(&self, patch: &RecordPatch) -> TimelineResult<Record> {
        record::record_patch(&self.pool, patch).await
    }

    async fn record_delete(&self, record_id: Uuid) -> TimelineResult<()> {
        record::record_delete(&self.pool, record_id).await
    }

    async fn upcoming_records(
        &self,
        window: Range<DateTime<Utc>>,
    ) -> TimelineResult<Vec<Reminder>> {
        record::upcoming_records(&self.pool, window).await
    }

    async fn mark_reminded(&self, record_ids: &[Uuid], at: DateTime<Utc>) -> TimelineResult<u64> {
        record::mark_reminded(&self.pool, record_ids, at).await
    }

    async fn feedback_add(
        &self,
        feedback: &Feedback,
        now: DateTime<Utc>,
    ) -> TimelineResult<Feedback> {
        record::feedback_add(&self.pool, feedback, now).await
    }

    async fn feedback(&self, record_id: Uuid) -> TimelineResult<Feedback> {
        record::feedback_by_record(&self.pool, record_id).await
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn delete_expired_codes(&self, now: DateTime<Utc>) -> TimelineResult<u64> {
        account::delete_expired_codes(&self.pool, now).await
    }

    async fn org_delete_expired(&self, cutoff: DateTime<Utc>) -> TimelineResult<u64> {
        account::org_delete_expired(&self.pool, cutoff).await
    }

    async fn user_delete_expired(&self, cutoff: DateTime<Utc>) -> TimelineResult<u64> {
        account::user_delete_expired(&self.pool, cutoff).await
    }
}
