mod common;

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use common::{Fixture, account, config, slot_for};
use pretty_assertions::assert_eq;
use timeline_core::{
    errors::TimelineError,
    repositories::SlotStore,
    services::{ExpirySweeper, RecordManager, SweepReport},
};
use timeline_db::{
    MemoryStore,
    mock::repositories::{MockAccountStore, MockNotifier, MockSlotStore},
};
use uuid::Uuid;

#[test_log::test(tokio::test)]
async fn test_failing_step_does_not_stop_sweep() {
    let mut slots = MockSlotStore::new();
    slots
        .expect_delete_expired_slots()
        .times(1)
        .returning(|_| Err(TimelineError::Database(eyre::eyre!("connection reset"))));

    let mut accounts = MockAccountStore::new();
    accounts
        .expect_delete_expired_codes()
        .times(1)
        .returning(|_| Ok(4));
    accounts
        .expect_org_delete_expired()
        .times(1)
        .returning(|_| Ok(1));
    accounts
        .expect_user_delete_expired()
        .times(1)
        .returning(|_| Ok(2));

    let sweeper = ExpirySweeper::new(Arc::new(slots), Arc::new(accounts), &config());
    let report = sweeper.sweep(Utc::now()).await;

    assert_eq!(
        report,
        SweepReport {
            slots: None,
            codes: Some(4),
            orgs: Some(1),
            users: Some(2),
        }
    );
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_account_cutoff_uses_grace_period() {
    let now = Utc::now();
    let expected_cutoff = now - TimeDelta::hours(24);

    let mut slots = MockSlotStore::new();
    slots
        .expect_delete_expired_slots()
        .withf(move |at| *at == now)
        .returning(|_| Ok(0));

    let mut accounts = MockAccountStore::new();
    accounts
        .expect_delete_expired_codes()
        .withf(move |at| *at == now)
        .returning(|_| Ok(0));
    accounts
        .expect_org_delete_expired()
        .withf(move |cutoff| *cutoff == expected_cutoff)
        .returning(|_| Ok(0));
    accounts
        .expect_user_delete_expired()
        .withf(move |cutoff| *cutoff == expected_cutoff)
        .returning(|_| Ok(0));

    let sweeper = ExpirySweeper::new(Arc::new(slots), Arc::new(accounts), &config());

    assert!(sweeper.sweep(now).await.is_complete());
}

#[tokio::test]
async fn test_sweep_removes_only_expired_and_unverified() {
    let store = Arc::new(MemoryStore::new());
    let now = Utc::now();
    let old = now - TimeDelta::hours(30);
    let fresh = now - TimeDelta::hours(1);

    let stale_org = Uuid::new_v4();
    let verified_org = Uuid::new_v4();
    let fresh_org = Uuid::new_v4();
    store.add_org(stale_org, account(false, old)).await;
    store.add_org(verified_org, account(true, old)).await;
    store.add_org(fresh_org, account(false, fresh)).await;

    store.add_user(Uuid::new_v4(), account(false, old)).await;
    store.add_user(Uuid::new_v4(), account(true, old)).await;

    store.add_code(now - TimeDelta::minutes(1)).await;
    store.add_code(now + TimeDelta::minutes(10)).await;

    let worker_id = Uuid::new_v4();
    store
        .add_slot(slot_for(worker_id, verified_org, now - TimeDelta::hours(2)))
        .await;
    store
        .add_slot(slot_for(worker_id, verified_org, now + TimeDelta::hours(2)))
        .await;

    let sweeper = ExpirySweeper::new(store.clone(), store.clone(), &config());
    let report = sweeper.sweep(now).await;

    assert_eq!(
        report,
        SweepReport {
            slots: Some(1),
            codes: Some(1),
            orgs: Some(1),
            users: Some(1),
        }
    );
    assert_eq!(store.org_count().await, 2);
    assert_eq!(store.user_count().await, 1);
    assert_eq!(store.code_count().await, 1);
    assert_eq!(store.slot_count().await, 1);
}

#[tokio::test]
async fn test_expired_slot_takes_its_record() {
    let fx = Fixture::new().await;
    let mut notifier = MockNotifier::new();
    notifier.expect_send_message().returning(|_| Ok(()));
    let manager = RecordManager::new(fx.store.clone(), Arc::new(notifier), &config());
    let record = manager.record_add(fx.booking()).await.unwrap();

    let sweeper = ExpirySweeper::new(fx.store.clone(), fx.store.clone(), &config());
    let report = sweeper.sweep(fx.slot.end + TimeDelta::minutes(1)).await;

    assert_eq!(report.slots, Some(1));
    assert_eq!(fx.store.record_count().await, 0);
    assert!(matches!(
        manager.record(record.record_id).await,
        Err(TimelineError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_removing_user_frees_their_slots() {
    let fx = Fixture::new().await;
    let stale_user = Uuid::new_v4();
    fx.store
        .add_user(stale_user, account(false, Utc::now() - TimeDelta::days(3)))
        .await;
    let mut notifier = MockNotifier::new();
    notifier.expect_send_message().returning(|_| Ok(()));
    let manager = RecordManager::new(fx.store.clone(), Arc::new(notifier), &config());
    let mut booking = fx.booking();
    booking.user_id = stale_user;
    manager.record_add(booking).await.unwrap();

    let sweeper = ExpirySweeper::new(fx.store.clone(), fx.store.clone(), &config());
    let report = sweeper.sweep(Utc::now()).await;

    assert_eq!(report.users, Some(1));
    assert_eq!(fx.store.record_count().await, 0);
    assert_eq!(fx.store.user_count().await, 1);
    assert!(!fx.store.slot(fx.slot.slot_id).await.unwrap().busy);
}
