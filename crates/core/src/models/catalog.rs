use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{TimelineError, TimelineResult};

const MAX_NAME_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Something an organization offers for booking.
///
/// `cost` is kept in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub cost: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub name: String,
    pub cost: i64,
    #[serde(default)]
    pub description: String,
}

impl ServiceRequest {
    pub fn validate(&self) -> TimelineResult<()> {
        check_name("service name", &self.name)?;
        if self.cost < 0 {
            return Err(TimelineError::Validation(format!(
                "service cost must not be negative, got {}",
                self.cost
            )));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(TimelineError::Validation(format!(
                "service description is longer than {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        Ok(())
    }

    pub fn into_service(self, org_id: Uuid, service_id: Uuid) -> TimelineResult<Service> {
        self.validate()?;
        Ok(Service {
            service_id,
            org_id,
            name: self.name.trim().to_string(),
            cost: self.cost,
            description: self.description,
        })
    }
}

/// A person whose time is booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: Uuid,
    pub org_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub degree: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub degree: String,
}

impl WorkerRequest {
    pub fn into_worker(self, org_id: Uuid) -> TimelineResult<Worker> {
        check_name("first name", &self.first_name)?;
        check_name("last name", &self.last_name)?;
        Ok(Worker {
            worker_id: Uuid::new_v4(),
            org_id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            position: self.position,
            degree: self.degree,
        })
    }
}

fn check_name(field: &str, value: &str) -> TimelineResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TimelineError::Validation(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(TimelineError::Validation(format!(
            "{} is longer than {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(())
}
