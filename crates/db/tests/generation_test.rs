mod common;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use common::{config, slot_for};
use pretty_assertions::assert_eq;
use rstest::rstest;
use timeline_core::{
    errors::TimelineError,
    models::schedule::{BreakWindow, CreateScheduleRequest, UpdateScheduleRequest, WorkerSchedule},
    repositories::{ScheduleStore, SlotStore},
    services::{AvailabilityService, SlotGenerator},
};
use timeline_db::MemoryStore;
use uuid::Uuid;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// 2030-01-07 is a Monday.
fn monday_midnight() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2030, 1, 7)
        .unwrap()
        .and_time(time(0, 0))
        .and_utc()
}

fn morning_request(worker_id: Uuid, weekday: u8) -> CreateScheduleRequest {
    CreateScheduleRequest {
        worker_id,
        weekday,
        start: time(9, 0),
        end: time(12, 0),
        break_window: Some(BreakWindow {
            start: time(10, 0),
            end: time(10, 30),
        }),
    }
}

fn services(store: &Arc<MemoryStore>) -> (AvailabilityService, SlotGenerator) {
    (
        AvailabilityService::new(store.clone(), store.clone(), &config()),
        SlotGenerator::new(store.clone(), store.clone(), &config()),
    )
}

#[test_log::test(tokio::test)]
async fn test_generation_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let (availability, generator) = services(&store);
    let org_id = Uuid::new_v4();
    let worker_id = Uuid::new_v4();
    availability
        .schedule_add(org_id, morning_request(worker_id, 1))
        .await
        .unwrap();

    let first = generator.generate_slots(monday_midnight()).await.unwrap();
    assert_eq!(first.schedules, 1);
    assert_eq!(first.drafted, 10);
    assert_eq!(first.inserted, 10);

    let second = generator.generate_slots(monday_midnight()).await.unwrap();
    assert_eq!(second.drafted, 10);
    assert_eq!(second.inserted, 0);
    assert_eq!(store.slot_count().await, 10);

    let listed = availability
        .slots(
            worker_id,
            monday_midnight(),
            monday_midnight() + TimeDelta::days(1),
        )
        .await
        .unwrap();
    assert_eq!(listed.len(), 5);
    assert!(listed.iter().all(|slot| !slot.busy && slot.org_id == org_id));
    assert!(listed.windows(2).all(|pair| pair[0].start < pair[1].start));
}

#[tokio::test]
async fn test_generation_skips_malformed_schedule() {
    let store = Arc::new(MemoryStore::new());
    let (_, generator) = services(&store);
    let broken = WorkerSchedule {
        schedule_id: Uuid::new_v4(),
        worker_id: Uuid::new_v4(),
        org_id: Uuid::new_v4(),
        weekday: 1,
        start: time(12, 0),
        end: time(9, 0),
        break_window: None,
    };
    store.schedule_add(&broken).await.unwrap();
    let good = morning_request(Uuid::new_v4(), 1)
        .into_schedule(Uuid::new_v4())
        .unwrap();
    store.schedule_add(&good).await.unwrap();

    let report = generator.generate_slots(monday_midnight()).await.unwrap();

    assert_eq!(report.schedules, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.inserted, 10);
}

#[tokio::test]
async fn test_generation_keeps_booked_slots() {
    let store = Arc::new(MemoryStore::new());
    let (availability, generator) = services(&store);
    let worker_id = Uuid::new_v4();
    availability
        .schedule_add(Uuid::new_v4(), morning_request(worker_id, 1))
        .await
        .unwrap();
    generator.generate_slots(monday_midnight()).await.unwrap();
    let first = store
        .slots(worker_id, monday_midnight()..monday_midnight() + TimeDelta::days(1))
        .await
        .unwrap()
        .remove(0);
    store.update_slot(first.slot_id, true).await.unwrap();

    generator.generate_slots(monday_midnight()).await.unwrap();

    assert!(store.slot(first.slot_id).await.unwrap().busy);
    assert_eq!(store.slot_count().await, 10);
}

#[tokio::test]
async fn test_expired_slot_boundary() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let worker_id = Uuid::new_v4();
    let org_id = Uuid::new_v4();
    // Ends exactly now, stays.
    let ending = slot_for(worker_id, org_id, now - TimeDelta::minutes(30));
    // Ended a minute ago, goes.
    let ended = slot_for(worker_id, org_id, now - TimeDelta::minutes(31));
    let upcoming = slot_for(worker_id, org_id, now + TimeDelta::hours(1));
    for slot in [&ending, &ended, &upcoming] {
        store.add_slot(slot.clone()).await;
    }

    let removed = store.delete_expired_slots(now).await.unwrap();

    assert_eq!(removed, 1);
    assert!(store.slot(ending.slot_id).await.is_ok());
    assert!(matches!(
        store.slot(ended.slot_id).await,
        Err(TimelineError::NotFound(_))
    ));
    assert!(store.slot(upcoming.slot_id).await.is_ok());
}

#[tokio::test]
async fn test_one_schedule_per_weekday() {
    let store = Arc::new(MemoryStore::new());
    let (availability, _) = services(&store);
    let org_id = Uuid::new_v4();
    let worker_id = Uuid::new_v4();
    availability
        .schedule_add(org_id, morning_request(worker_id, 3))
        .await
        .unwrap();

    let duplicate = availability
        .schedule_add(org_id, morning_request(worker_id, 3))
        .await;

    assert!(matches!(duplicate, Err(TimelineError::Conflict(_))));
}

#[tokio::test]
async fn test_schedule_update_and_delete() {
    let store = Arc::new(MemoryStore::new());
    let (availability, _) = services(&store);
    let org_id = Uuid::new_v4();
    let worker_id = Uuid::new_v4();
    let other_worker = Uuid::new_v4();
    let stored = availability
        .schedule_add(org_id, morning_request(worker_id, 1))
        .await
        .unwrap();
    availability
        .schedule_add(org_id, morning_request(other_worker, 1))
        .await
        .unwrap();

    let updated = availability
        .schedule_update(
            stored.schedule_id,
            UpdateScheduleRequest {
                weekday: 2,
                start: time(13, 0),
                end: time(17, 0),
                break_window: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.schedule_id, stored.schedule_id);
    assert_eq!(updated.weekday, 2);

    let mine = availability.schedules(org_id, Some(worker_id)).await.unwrap();
    assert_eq!(mine, vec![updated.clone()]);
    assert_eq!(availability.schedules(org_id, None).await.unwrap().len(), 2);

    availability.schedule_delete(stored.schedule_id).await.unwrap();
    assert!(matches!(
        availability.schedule_delete(stored.schedule_id).await,
        Err(TimelineError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_invalid_schedule_never_reaches_store() {
    let store = Arc::new(MemoryStore::new());
    let (availability, _) = services(&store);
    let mut request = morning_request(Uuid::new_v4(), 1);
    request.weekday = 0;

    let result = availability.schedule_add(Uuid::new_v4(), request).await;

    assert!(matches!(result, Err(TimelineError::Validation(_))));
    assert!(store.all_schedules().await.unwrap().is_empty());
}

#[rstest]
#[case::inverted(TimeDelta::hours(-1))]
#[case::empty(TimeDelta::zero())]
#[case::too_long(TimeDelta::days(63))]
#[tokio::test]
async fn test_slot_listing_range_checked(#[case] span: TimeDelta) {
    let store = Arc::new(MemoryStore::new());
    let (availability, _) = services(&store);
    let from = Utc::now();

    let result = availability.slots(Uuid::new_v4(), from, from + span).await;

    assert!(matches!(result, Err(TimelineError::Validation(_))));
}
