//! Narrow storage capabilities consumed by the booking services.
//!
//! Each trait covers one concern so a service only receives the handle it
//! needs. The PostgreSQL implementations live in `timeline-db`.

use std::ops::Range;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    errors::TimelineResult,
    models::{
        catalog::{Service, Worker},
        notification::Message,
        record::{Feedback, NewRecord, Record, RecordList, RecordListParams, RecordPatch, Reminder},
        schedule::WorkerSchedule,
        slot::{Slot, SlotDraft},
    },
};

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn schedule_add(&self, schedule: &WorkerSchedule) -> TimelineResult<WorkerSchedule>;

    async fn schedule(&self, schedule_id: Uuid) -> TimelineResult<WorkerSchedule>;

    async fn schedule_update(&self, schedule: &WorkerSchedule) -> TimelineResult<WorkerSchedule>;

    async fn schedule_delete(&self, schedule_id: Uuid) -> TimelineResult<()>;

    async fn schedules(
        &self,
        org_id: Uuid,
        worker_id: Option<Uuid>,
    ) -> TimelineResult<Vec<WorkerSchedule>>;

    async fn all_schedules(&self) -> TimelineResult<Vec<WorkerSchedule>>;
}

/// Services an organization offers. Every lookup is scoped to the org.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn service_add(&self, service: &Service) -> TimelineResult<Service>;

    async fn service_update(&self, service: &Service) -> TimelineResult<Service>;

    async fn service(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<Service>;

    async fn service_list(&self, org_id: Uuid) -> TimelineResult<Vec<Service>>;

    /// Removes the service and its worker links. Slots booked for it are
    /// released together with the cascaded records.
    async fn service_delete(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<()>;

    /// Workers linked to the service.
    async fn service_worker_list(
        &self,
        org_id: Uuid,
        service_id: Uuid,
    ) -> TimelineResult<Vec<Worker>>;
}

#[async_trait]
pub trait WorkerStore: Send + Sync {
    async fn worker_add(&self, worker: &Worker) -> TimelineResult<Worker>;

    async fn worker(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<Worker>;

    async fn worker_list(&self, org_id: Uuid) -> TimelineResult<Vec<Worker>>;

    /// Removes the worker together with their schedules, slots and records.
    async fn worker_delete(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<()>;

    /// Links a worker to a service of the same org. Linking twice is a no-op.
    async fn worker_assign_service(
        &self,
        org_id: Uuid,
        worker_id: Uuid,
        service_id: Uuid,
    ) -> TimelineResult<()>;
}

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Inserts drafts, skipping any (worker, start) pair already stored.
    /// Returns the number of rows actually created.
    async fn insert_slots(&self, drafts: &[SlotDraft]) -> TimelineResult<u64>;

    async fn slot(&self, slot_id: Uuid) -> TimelineResult<Slot>;

    /// Slots of a worker starting inside `range`, ordered by start.
    async fn slots(&self, worker_id: Uuid, range: Range<DateTime<Utc>>)
    -> TimelineResult<Vec<Slot>>;

    /// Claims (`busy = true`) or releases (`busy = false`) a slot.
    ///
    /// A claim on a busy slot fails with `SlotUnavailable`.
    async fn update_slot(&self, slot_id: Uuid, busy: bool) -> TimelineResult<()>;

    async fn delete_expired_slots(&self, now: DateTime<Utc>) -> TimelineResult<u64>;
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn record(&self, record_id: Uuid) -> TimelineResult<Record>;

    async fn record_list(&self, params: &RecordListParams) -> TimelineResult<RecordList>;

    /// Claims the slot and writes the record in one transaction.
    async fn record_add(&self, record: &NewRecord) -> TimelineResult<Reminder>;

    async fn record_patch(&self, patch: &RecordPatch) -> TimelineResult<Record>;

    /// Releases the slot and removes the record in one transaction.
    async fn record_delete(&self, record_id: Uuid) -> TimelineResult<()>;

    /// Records not reminded yet whose slot starts inside `window`.
    async fn upcoming_records(&self, window: Range<DateTime<Utc>>)
    -> TimelineResult<Vec<Reminder>>;

    async fn mark_reminded(&self, record_ids: &[Uuid], at: DateTime<Utc>) -> TimelineResult<u64>;

    async fn feedback_add(&self, feedback: &Feedback, now: DateTime<Utc>)
    -> TimelineResult<Feedback>;

    async fn feedback(&self, record_id: Uuid) -> TimelineResult<Feedback>;
}

/// Cleanup of verification codes and accounts that were never verified.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn delete_expired_codes(&self, now: DateTime<Utc>) -> TimelineResult<u64>;

    /// Removes unverified organizations registered before `cutoff`.
    async fn org_delete_expired(&self, cutoff: DateTime<Utc>) -> TimelineResult<u64>;

    /// Removes unverified users registered before `cutoff`.
    async fn user_delete_expired(&self, cutoff: DateTime<Utc>) -> TimelineResult<u64>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, message: Message) -> eyre::Result<()>;
}
