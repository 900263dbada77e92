#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use fake::{
    Fake,
    faker::{
        internet::en::SafeEmail,
        name::en::{FirstName, LastName},
    },
};
use timeline_core::{
    config::BookingConfig,
    models::{
        catalog::{Service, Worker},
        record::NewRecord,
        slot::Slot,
    },
    repositories::{CatalogStore, WorkerStore},
};
use timeline_db::{MemoryStore, memory::Account};
use uuid::Uuid;

/// One org with a worker, a service, a verified user and a free slot.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub org_id: Uuid,
    pub user_id: Uuid,
    pub worker_id: Uuid,
    pub service_id: Uuid,
    pub slot: Slot,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_store(MemoryStore::new()).await
    }

    pub async fn with_store(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        let org_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        store.add_org(org_id, account(true, Utc::now())).await;
        store.add_user(user_id, account(true, Utc::now())).await;
        let worker_id = store
            .worker_add(&worker_in(org_id))
            .await
            .expect("failed to add worker")
            .worker_id;
        let service_id = store
            .service_add(&service_in(org_id, "Haircut"))
            .await
            .expect("failed to add service")
            .service_id;

        let start = Utc::now() + TimeDelta::hours(2);
        let slot = slot_for(worker_id, org_id, start);
        store.add_slot(slot.clone()).await;

        Self {
            store,
            org_id,
            user_id,
            worker_id,
            service_id,
            slot,
        }
    }

    pub fn booking(&self) -> NewRecord {
        self.booking_for(&self.slot)
    }

    pub fn booking_for(&self, slot: &Slot) -> NewRecord {
        NewRecord {
            org_id: self.org_id,
            user_id: self.user_id,
            slot_id: slot.slot_id,
            service_id: self.service_id,
            worker_id: self.worker_id,
        }
    }

    pub async fn add_slot_at(&self, start: DateTime<Utc>) -> Slot {
        let slot = slot_for(self.worker_id, self.org_id, start);
        self.store.add_slot(slot.clone()).await;
        slot
    }
}

pub fn account(verified: bool, created_at: DateTime<Utc>) -> Account {
    Account {
        email: SafeEmail().fake(),
        verified,
        created_at,
    }
}

pub fn worker_in(org_id: Uuid) -> Worker {
    Worker {
        worker_id: Uuid::new_v4(),
        org_id,
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        position: "Barber".to_string(),
        degree: String::new(),
    }
}

pub fn service_in(org_id: Uuid, name: &str) -> Service {
    Service {
        service_id: Uuid::new_v4(),
        org_id,
        name: name.to_string(),
        cost: 2500,
        description: String::new(),
    }
}

pub fn slot_for(worker_id: Uuid, org_id: Uuid, start: DateTime<Utc>) -> Slot {
    Slot {
        slot_id: Uuid::new_v4(),
        worker_id,
        org_id,
        start,
        end: start + TimeDelta::minutes(30),
        busy: false,
    }
}

pub fn config() -> BookingConfig {
    BookingConfig {
        store_timeout_seconds: 1,
        ..BookingConfig::default()
    }
}
