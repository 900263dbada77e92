use std::ops::Range;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use timeline_core::{
    errors::TimelineResult,
    models::{
        catalog::{Service, Worker},
        notification::Message,
        record::{Feedback, NewRecord, Record, RecordList, RecordListParams, RecordPatch, Reminder},
        schedule::WorkerSchedule,
        slot::{Slot, SlotDraft},
    },
    repositories::{
        AccountStore, CatalogStore, Notifier, RecordStore, ScheduleStore, SlotStore, WorkerStore,
    },
};
use uuid::Uuid;

// Mock stores for testing
mock! {
    pub ScheduleStore {}

    #[async_trait]
    impl ScheduleStore for ScheduleStore {
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
}

mock! {
    pub SlotStore {}

    #[async_trait]
    impl SlotStore for SlotStore {
        async fn insert_slots(&self, drafts: &[SlotDraft]) -> TimelineResult<u64>;

        async fn slot(&self, slot_id: Uuid) -> TimelineResult<Slot>;

        async fn slots(
            &self,
            worker_id: Uuid,
            range: Range<DateTime<Utc>>,
        ) -> TimelineResult<Vec<Slot>>;

        async fn update_slot(&self, slot_id: Uuid, busy: bool) -> TimelineResult<()>;

        async fn delete_expired_slots(&self, now: DateTime<Utc>) -> TimelineResult<u64>;
    }
}

mock! {
    pub RecordStore {}

    #[async_trait]
    impl RecordStore for RecordStore {
        async fn record(&self, record_id: Uuid) -> TimelineResult<Record>;

        async fn record_list(&self, params: &RecordListParams) -> TimelineResult<RecordList>;

        async fn record_add(&self, record: &NewRecord) -> TimelineResult<Reminder>;

        async fn record_patch(&self, patch: &RecordPatch) -> TimelineResult<Record>;

        async fn record_delete(&self, record_id: Uuid) -> TimelineResult<()>;

        async fn upcoming_records(
            &self,
            window: Range<DateTime<Utc>>,
        ) -> TimelineResult<Vec<Reminder>>;

        async fn mark_reminded(&self, record_ids: &[Uuid], at: DateTime<Utc>) -> TimelineResult<u64>;

        async fn feedback_add(
            &self,
            feedback: &Feedback,
            now: DateTime<Utc>,
        ) -> TimelineResult<Feedback>;

        async fn feedback(&self, record_id: Uuid) -> TimelineResult<Feedback>;
    }
}

mock! {
    pub AccountStore {}

    #[async_trait]
    impl AccountStore for AccountStore {
        async fn delete_expired_codes(&self, now: DateTime<Utc>) -> TimelineResult<u64>;

        async fn org_delete_expired(&self, cutoff: DateTime<Utc>) -> TimelineResult<u64>;

        async fn user_delete_expired(&self, cutoff: DateTime<Utc>) -> TimelineResult<u64>;
    }
}

mock! {
    pub Notifier {}

    #[async_trait]
    impl Notifier for Notifier {
        async fn send_message(&self, message: Message) -> eyre::Result<()>;
    }
}

mock! {
    pub CatalogStore {}

    #[async_trait]
    impl CatalogStore for CatalogStore {
        async fn service_add(&self, service: &Service) -> TimelineResult<Service>;

        async fn service_update(&self, service: &Service) -> TimelineResult<Service>;

        async fn service(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<Service>;

        async fn service_list(&self, org_id: Uuid) -> TimelineResult<Vec<Service>>;

        async fn service_delete(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<()>;

        async fn service_worker_list(
            &self,
            org_id: Uuid,
            service_id: Uuid,
        ) -> TimelineResult<Vec<Worker>>;
    }
}

mock! {
    pub WorkerStore {}

    #[async_trait]
    impl WorkerStore for WorkerStore {
        async fn worker_add(&self, worker: &Worker) -> TimelineResult<Worker>;

        async fn worker(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<Worker>;

        async fn worker_list(&self, org_id: Uuid) -> TimelineResult<Vec<Worker>>;

        async fn worker_delete(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<()>;

        async fn worker_assign_service(
            &self,
            org_id: Uuid,
            worker_id: Uuid,
            service_id: Uuid,
        ) -> TimelineResult<()>;
    }
}
