//! In-process implementation of the storage traits.
//!
//! All state sits behind one async mutex, so every call is serialized the
//! way a single-row lock serializes it in PostgreSQL. Mutating calls check
//! everything first and only then write, which gives them the same
//! all-or-nothing behavior as the SQL transactions. An optional latency is
//! injected between the checks and the writes to let tests cancel a call
//! halfway through.

use std::{
    collections::{HashMap, HashSet},
    ops::Range,
    time::Duration,
};

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
use tokio::sync::Mutex;
use uuid::Uuid;

/// An organization or user as far as the expiry sweep is concerned.
#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct VerificationCode {
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredRecord {
    record: Record,
    reminded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct State {
    orgs: HashMap<Uuid, Account>,
    users: HashMap<Uuid, Account>,
    codes: Vec<VerificationCode>,
    workers: HashMap<Uuid, Worker>,
    services: HashMap<Uuid, Service>,
    /// (worker_id, service_id) pairs.
    worker_services: HashSet<(Uuid, Uuid)>,
    schedules: HashMap<Uuid, WorkerSchedule>,
    slots: HashMap<Uuid, Slot>,
    records: HashMap<Uuid, StoredRecord>,
    feedback: HashMap<Uuid, Feedback>,
}

impl State {
    fn reminder(&self, stored: &StoredRecord) -> TimelineResult<Reminder> {
        let record = &stored.record;
        let slot = self.slots.get(&record.slot_id).ok_or_else(|| {
            TimelineError::NotFound(format!("Slot with ID {} not found", record.slot_id))
        })?;
        let user = self.users.get(&record.user_id).ok_or_else(|| {
            TimelineError::NotFound(format!("User with ID {} not found", record.user_id))
        })?;
        Ok(Reminder {
            record: record.clone(),
            user_email: user.email.clone(),
            slot_start: slot.start,
            slot_end: slot.end,
        })
    }

    /// Drops records whose slot no longer exists, like the SQL cascade.
    fn cascade_slots(&mut self) {
        let slots = &self.slots;
        let orphaned: Vec<Uuid> = self
            .records
            .iter()
            .filter(|(_, stored)| !slots.contains_key(&stored.record.slot_id))
            .map(|(id, _)| *id)
            .collect();
        for record_id in orphaned {
            self.records.remove(&record_id);
            self.feedback.remove(&record_id);
        }
    }

    fn cascade_users(&mut self) {
        let users = &self.users;
        let orphaned: Vec<Uuid> = self
            .records
            .iter()
            .filter(|(_, stored)| !users.contains_key(&stored.record.user_id))
            .map(|(id, _)| *id)
            .collect();
        for record_id in orphaned {
            if let Some(stored) = self.records.remove(&record_id) {
                if let Some(slot) = self.slots.get_mut(&stored.record.slot_id) {
                    slot.busy = false;
                }
            }
            self.feedback.remove(&record_id);
        }
    }

    fn cascade_orgs(&mut self) {
        let orgs = &self.orgs;
        let removed: Vec<Uuid> = self
            .workers
            .values()
            .filter(|w| !orgs.contains_key(&w.org_id))
            .map(|w| w.worker_id)
            .collect();
        self.services.retain(|_, s| orgs.contains_key(&s.org_id));
        let services = &self.services;
        self.worker_services
            .retain(|(_, service_id)| services.contains_key(service_id));
        self.drop_workers(&removed);
        let orgs = &self.orgs;
        self.schedules.retain(|_, s| orgs.contains_key(&s.org_id));
        self.slots.retain(|_, s| orgs.contains_key(&s.org_id));
        self.cascade_slots();
    }

    /// Removes workers along with their links, schedules and slots.
    fn drop_workers(&mut self, removed: &[Uuid]) {
        for worker_id in removed {
            self.workers.remove(worker_id);
        }
        self.worker_services
            .retain(|(worker_id, _)| !removed.contains(worker_id));
        self.schedules.retain(|_, s| !removed.contains(&s.worker_id));
        self.slots.retain(|_, s| !removed.contains(&s.worker_id));
        self.cascade_slots();
    }

    fn service_in_org(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<&Service> {
        self.services
            .get(&service_id)
            .filter(|service| service.org_id == org_id)
            .ok_or_else(|| service_not_found(service_id))
    }

    fn worker_in_org(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<&Worker> {
        self.workers
            .get(&worker_id)
            .filter(|worker| worker.org_id == org_id)
            .ok_or_else(|| worker_not_found(worker_id))
    }

    fn require_org(&self, org_id: Uuid) -> TimelineResult<()> {
        if self.orgs.contains_key(&org_id) {
            Ok(())
        } else {
            Err(TimelineError::NotFound(format!(
                "Organization with ID {} not found",
                org_id
            )))
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pause inside every mutating call, after validation and before
    /// any write.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            state: Mutex::default(),
            latency: Some(latency),
        }
    }

    pub async fn add_org(&self, org_id: Uuid, account: Account) {
        self.state.lock().await.orgs.insert(org_id, account);
    }

    pub async fn add_user(&self, user_id: Uuid, account: Account) {
        self.state.lock().await.users.insert(user_id, account);
    }

    pub async fn add_code(&self, expires_at: DateTime<Utc>) {
        self.state
            .lock()
            .await
            .codes
            .push(VerificationCode { expires_at });
    }

    /// Stores a slot as-is, bypassing generation.
    pub async fn add_slot(&self, slot: Slot) {
        self.state.lock().await.slots.insert(slot.slot_id, slot);
    }

    pub async fn org_count(&self) -> usize {
        self.state.lock().await.orgs.len()
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    pub async fn code_count(&self) -> usize {
        self.state.lock().await.codes.len()
    }

    pub async fn slot_count(&self) -> usize {
        self.state.lock().await.slots.len()
    }

    pub async fn record_count(&self) -> usize {
        self.state.lock().await.records.len()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn slot_not_found(slot_id: Uuid) -> TimelineError {
    TimelineError::NotFound(format!("Slot with ID {} not found", slot_id))
}

fn record_not_found(record_id: Uuid) -> TimelineError {
    TimelineError::NotFound(format!("Record with ID {} not found", record_id))
}

fn schedule_not_found(schedule_id: Uuid) -> TimelineError {
    TimelineError::NotFound(format!("Schedule with ID {} not found", schedule_id))
}

fn service_not_found(service_id: Uuid) -> TimelineError {
    TimelineError::NotFound(format!("Service with ID {} not found", service_id))
}

fn worker_not_found(worker_id: Uuid) -> TimelineError {
    TimelineError::NotFound(format!("Worker with ID {} not found", worker_id))
}

fn weekday_taken(schedule: &WorkerSchedule) -> TimelineError {
    TimelineError::Conflict(format!(
        "worker {} already has a schedule for weekday {}",
        schedule.worker_id, schedule.weekday
    ))
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn schedule_add(&self, schedule: &WorkerSchedule) -> TimelineResult<WorkerSchedule> {
        let mut state = self.state.lock().await;
        let taken = state.schedules.values().any(|s| {
            s.worker_id == schedule.worker_id && s.weekday == schedule.weekday
        });
        if taken || state.schedules.contains_key(&schedule.schedule_id) {
            return Err(weekday_taken(schedule));
        }
        self.pause().await;
        state
            .schedules
            .insert(schedule.schedule_id, schedule.clone());
        Ok(schedule.clone())
    }

    async fn schedule(&self, schedule_id: Uuid) -> TimelineResult<WorkerSchedule> {
        let state = self.state.lock().await;
        state
            .schedules
            .get(&schedule_id)
            .cloned()
            .ok_or_else(|| schedule_not_found(schedule_id))
    }

    async fn schedule_update(&self, schedule: &WorkerSchedule) -> TimelineResult<WorkerSchedule> {
        let mut state = self.state.lock().await;
        if !state.schedules.contains_key(&schedule.schedule_id) {
            return Err(schedule_not_found(schedule.schedule_id));
        }
        let taken = state.schedules.values().any(|s| {
            s.schedule_id != schedule.schedule_id
                && s.worker_id == schedule.worker_id
                && s.weekday == schedule.weekday
        });
        if taken {
            return Err(weekday_taken(schedule));
        }
        self.pause().await;
        state
            .schedules
            .insert(schedule.schedule_id, schedule.clone());
        Ok(schedule.clone())
    }

    async fn schedule_delete(&self, schedule_id: Uuid) -> TimelineResult<()> {
        let mut state = self.state.lock().await;
        state
            .schedules
            .remove(&schedule_id)
            .map(|_| ())
            .ok_or_else(|| schedule_not_found(schedule_id))
    }

    async fn schedules(
        &self,
        org_id: Uuid,
        worker_id: Option<Uuid>,
    ) -> TimelineResult<Vec<WorkerSchedule>> {
        let state = self.state.lock().await;
        let mut found: Vec<WorkerSchedule> = state
            .schedules
            .values()
            .filter(|s| s.org_id == org_id && worker_id.is_none_or(|w| s.worker_id == w))
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.worker_id, s.weekday));
        Ok(found)
    }

    async fn all_schedules(&self) -> TimelineResult<Vec<WorkerSchedule>> {
        let state = self.state.lock().await;
        let mut found: Vec<WorkerSchedule> = state.schedules.values().cloned().collect();
        found.sort_by_key(|s| (s.worker_id, s.weekday));
        Ok(found)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn service_add(&self, service: &Service) -> TimelineResult<Service> {
        let mut state = self.state.lock().await;
        state.require_org(service.org_id)?;
        if state.services.contains_key(&service.service_id) {
            return Err(TimelineError::Conflict(format!(
                "Service with ID {} already exists",
                service.service_id
            )));
        }
        self.pause().await;
        state.services.insert(service.service_id, service.clone());
        Ok(service.clone())
    }

    async fn service_update(&self, service: &Service) -> TimelineResult<Service> {
        let mut state = self.state.lock().await;
        state.service_in_org(service.org_id, service.service_id)?;
        self.pause().await;
        state.services.insert(service.service_id, service.clone());
        Ok(service.clone())
    }

    async fn service(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<Service> {
        let state = self.state.lock().await;
        state.service_in_org(org_id, service_id).cloned()
    }

    async fn service_list(&self, org_id: Uuid) -> TimelineResult<Vec<Service>> {
        let state = self.state.lock().await;
        let mut found: Vec<Service> = state
            .services
            .values()
            .filter(|s| s.org_id == org_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn service_delete(&self, org_id: Uuid, service_id: Uuid) -> TimelineResult<()> {
        let mut state = self.state.lock().await;
        state.service_in_org(org_id, service_id)?;

        self.pause().await;

        state.services.remove(&service_id);
        state.worker_services.retain(|(_, linked)| *linked != service_id);
        let cancelled: Vec<(Uuid, Uuid)> = state
            .records
            .values()
            .filter(|stored| stored.record.service_id == service_id)
            .map(|stored| (stored.record.record_id, stored.record.slot_id))
            .collect();
        for (record_id, slot_id) in cancelled {
            state.records.remove(&record_id);
            state.feedback.remove(&record_id);
            if let Some(slot) = state.slots.get_mut(&slot_id) {
                slot.busy = false;
            }
        }
        Ok(())
    }

    async fn service_worker_list(
        &self,
        org_id: Uuid,
        service_id: Uuid,
    ) -> TimelineResult<Vec<Worker>> {
        let state = self.state.lock().await;
        state.service_in_org(org_id, service_id)?;
        let mut found: Vec<Worker> = state
            .worker_services
            .iter()
            .filter(|(_, linked)| *linked == service_id)
            .filter_map(|(worker_id, _)| state.workers.get(worker_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(found)
    }
}

#[async_trait]
impl WorkerStore for MemoryStore {
    async fn worker_add(&self, worker: &Worker) -> TimelineResult<Worker> {
        let mut state = self.state.lock().await;
        state.require_org(worker.org_id)?;
        if state.workers.contains_key(&worker.worker_id) {
            return Err(TimelineError::Conflict(format!(
                "Worker with ID {} already exists",
                worker.worker_id
            )));
        }
        self.pause().await;
        state.workers.insert(worker.worker_id, worker.clone());
        Ok(worker.clone())
    }

    async fn worker(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<Worker> {
        let state = self.state.lock().await;
        state.worker_in_org(org_id, worker_id).cloned()
    }

    async fn worker_list(&self, org_id: Uuid) -> TimelineResult<Vec<Worker>> {
        let state = self.state.lock().await;
        let mut found: Vec<Worker> = state
            .workers
            .values()
            .filter(|w| w.org_id == org_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(found)
    }

    async fn worker_delete(&self, org_id: Uuid, worker_id: Uuid) -> TimelineResult<()> {
        let mut state = self.state.lock().await;
        state.worker_in_org(org_id, worker_id)?;
        self.pause().await;
        state.drop_workers(&[worker_id]);
        Ok(())
    }

    async fn worker_assign_service(
        &self,
        org_id: Uuid,
        worker_id: Uuid,
        service_id: Uuid,
    ) -> TimelineResult<()> {
        let mut state = self.state.lock().await;
        state.worker_in_org(org_id, worker_id)?;
        state.service_in_org(org_id, service_id)?;
        state.worker_services.insert((worker_id, service_id));
        Ok(())
    }
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn insert_slots(&self, drafts: &[SlotDraft]) -> TimelineResult<u64> {
        let mut state = self.state.lock().await;
        let mut inserted = 0;
        for draft in drafts {
            let exists = state
                .slots
                .values()
                .any(|s| s.worker_id == draft.worker_id && s.start == draft.start);
            if exists {
                continue;
            }
            let slot = Slot {
                slot_id: Uuid::new_v4(),
                worker_id: draft.worker_id,
                org_id: draft.org_id,
                start: draft.start,
                end: draft.end,
                busy: false,
            };
            state.slots.insert(slot.slot_id, slot);
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn slot(&self, slot_id: Uuid) -> TimelineResult<Slot> {
        let state = self.state.lock().await;
        state
            .slots
            .get(&slot_id)
            .cloned()
            .ok_or_else(|| slot_not_found(slot_id))
    }

    async fn slots(
        &self,
        worker_id: Uuid,
        range: Range<DateTime<Utc>>,
    ) -> TimelineResult<Vec<Slot>> {
        let state = self.state.lock().await;
        let mut found: Vec<Slot> = state
            .slots
            .values()
            .filter(|s| s.worker_id == worker_id && range.contains(&s.start))
            .cloned()
            .collect();
        found.sort_by_key(|s| s.start);
        Ok(found)
    }

    async fn update_slot(&self, slot_id: Uuid, busy: bool) -> TimelineResult<()> {
        let mut state = self.state.lock().await;
        let slot = state
            .slots
            .get_mut(&slot_id)
            .ok_or_else(|| slot_not_found(slot_id))?;
        if busy {
            claim(slot, Utc::now())
        } else {
            slot.busy = false;
            Ok(())
        }
    }

    async fn delete_expired_slots(&self, now: DateTime<Utc>) -> TimelineResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.slots.len();
        state.slots.retain(|_, s| s.end >= now);
        let removed = before - state.slots.len();
        state.cascade_slots();
        Ok(removed as u64)
    }
}

/// The conditional free-to-busy transition.
fn claim(slot: &mut Slot, now: DateTime<Utc>) -> TimelineResult<()> {
    if slot.busy {
        return Err(TimelineError::SlotUnavailable {
            slot_id: slot.slot_id,
        });
    }
    if slot.start <= now {
        return Err(TimelineError::Validation(format!(
            "Slot {} has already started",
            slot.slot_id
        )));
    }
    slot.busy = true;
    Ok(())
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn record(&self, record_id: Uuid) -> TimelineResult<Record> {
        let state = self.state.lock().await;
        state
            .records
            .get(&record_id)
            .map(|stored| stored.record.clone())
            .ok_or_else(|| record_not_found(record_id))
    }

    async fn record_list(&self, params: &RecordListParams) -> TimelineResult<RecordList> {
        let state = self.state.lock().await;
        let mut matching: Vec<Record> = state
            .records
            .values()
            .map(|stored| &stored.record)
            .filter(|r| params.org_id.is_none_or(|org| r.org_id == org))
            .filter(|r| params.user_id.is_none_or(|user| r.user_id == user))
            .filter(|r| params.reviewed.is_none_or(|reviewed| r.reviewed == reviewed))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let found = matching.len() as i64;
        let records = matching
            .into_iter()
            .skip(usize::try_from(params.offset).unwrap_or_default())
            .take(usize::try_from(params.limit).unwrap_or_default())
            .collect();
        Ok(RecordList { records, found })
    }

    async fn record_add(&self, new_record: &NewRecord) -> TimelineResult<Reminder> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let slot = state
            .slots
            .get(&new_record.slot_id)
            .ok_or_else(|| slot_not_found(new_record.slot_id))?;
        if slot.worker_id != new_record.worker_id || slot.org_id != new_record.org_id {
            return Err(TimelineError::Validation(format!(
                "Slot {} does not belong to worker {} of org {}",
                new_record.slot_id, new_record.worker_id, new_record.org_id
            )));
        }
        if !state.users.contains_key(&new_record.user_id) {
            return Err(TimelineError::NotFound(format!(
                "User with ID {} not found",
                new_record.user_id
            )));
        }

        state.service_in_org(new_record.org_id, new_record.service_id)?;

        let booked = state
            .records
            .values()
            .any(|stored| stored.record.slot_id == new_record.slot_id);
        if booked {
            return Err(TimelineError::SlotUnavailable {
                slot_id: new_record.slot_id,
            });
        }

        let mut claimed = slot.clone();
        claim(&mut claimed, now)?;

        self.pause().await;

        let stored = StoredRecord {
            record: Record {
                record_id: Uuid::new_v4(),
                org_id: new_record.org_id,
                user_id: new_record.user_id,
                slot_id: new_record.slot_id,
                service_id: new_record.service_id,
                worker_id: new_record.worker_id,
                reviewed: false,
                created_at: now,
            },
            reminded_at: None,
        };
        state.slots.insert(claimed.slot_id, claimed);
        state
            .records
            .insert(stored.record.record_id, stored.clone());
        state.reminder(&stored)
    }

    async fn record_patch(&self, patch: &RecordPatch) -> TimelineResult<Record> {
        let mut state = self.state.lock().await;
        let stored = state
            .records
            .get_mut(&patch.record_id)
            .ok_or_else(|| record_not_found(patch.record_id))?;
        stored.record.reviewed = patch.reviewed;
        Ok(stored.record.clone())
    }

    async fn record_delete(&self, record_id: Uuid) -> TimelineResult<()> {
        let mut state = self.state.lock().await;
        let slot_id = state
            .records
            .get(&record_id)
            .map(|stored| stored.record.slot_id)
            .ok_or_else(|| record_not_found(record_id))?;
        if !state.slots.contains_key(&slot_id) {
            return Err(slot_not_found(slot_id));
        }

        self.pause().await;

        state.records.remove(&record_id);
        state.feedback.remove(&record_id);
        if let Some(slot) = state.slots.get_mut(&slot_id) {
            slot.busy = false;
        }
        Ok(())
    }

    async fn upcoming_records(
        &self,
        window: Range<DateTime<Utc>>,
    ) -> TimelineResult<Vec<Reminder>> {
        let state = self.state.lock().await;
        let mut upcoming = Vec::new();
        for stored in state.records.values() {
            if stored.reminded_at.is_some() {
                continue;
            }
            let Some(slot) = state.slots.get(&stored.record.slot_id) else {
                continue;
            };
            if window.contains(&slot.start) {
                upcoming.push(state.reminder(stored)?);
            }
        }
        upcoming.sort_by_key(|r| r.slot_start);
        Ok(upcoming)
    }

    async fn mark_reminded(&self, record_ids: &[Uuid], at: DateTime<Utc>) -> TimelineResult<u64> {
        let mut state = self.state.lock().await;
        let mut marked = 0;
        for record_id in record_ids {
            if let Some(stored) = state.records.get_mut(record_id) {
                stored.reminded_at = Some(at);
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn feedback_add(
        &self,
        feedback: &Feedback,
        now: DateTime<Utc>,
    ) -> TimelineResult<Feedback> {
        let mut state = self.state.lock().await;
        let stored = state
            .records
            .get(&feedback.record_id)
            .ok_or_else(|| record_not_found(feedback.record_id))?;
        let slot = state
            .slots
            .get(&stored.record.slot_id)
            .ok_or_else(|| slot_not_found(stored.record.slot_id))?;
        if slot.end > now {
            return Err(TimelineError::Validation(
                "feedback is accepted only after the appointment".to_string(),
            ));
        }
        if stored.record.reviewed || state.feedback.contains_key(&feedback.record_id) {
            return Err(TimelineError::Conflict(format!(
                "Record {} already has feedback",
                feedback.record_id
            )));
        }

        self.pause().await;

        if let Some(stored) = state.records.get_mut(&feedback.record_id) {
            stored.record.reviewed = true;
        }
        state.feedback.insert(feedback.record_id, feedback.clone());
        Ok(feedback.clone())
    }

    async fn feedback(&self, record_id: Uuid) -> TimelineResult<Feedback> {
        let state = self.state.lock().await;
        state.feedback.get(&record_id).cloned().ok_or_else(|| {
            TimelineError::NotFound(format!("Feedback for record {} not found", record_id))
        })
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn delete_expired_codes(&self, now: DateTime<Utc>) -> TimelineResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.codes.len();
        state.codes.retain(|code| code.expires_at >= now);
        Ok((before - state.codes.len()) as u64)
    }

    async fn org_delete_expired(&self, cutoff: DateTime<Utc>) -> TimelineResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.orgs.len();
        state
            .orgs
            .retain(|_, org| org.verified || org.created_at >= cutoff);
        let removed = before - state.orgs.len();
        state.cascade_orgs();
        Ok(removed as u64)
    }

    async fn user_delete_expired(&self, cutoff: DateTime<Utc>) -> TimelineResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.users.len();
        state
            .users
            .retain(|_, user| user.verified || user.created_at >= cutoff);
        let removed = before - state.users.len();
        state.cascade_users();
        Ok(removed as u64)
    }
}
