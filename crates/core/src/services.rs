//! Booking services built on top of the storage traits.

mod deadline;

pub mod availability;
pub mod catalog;
pub mod generator;
pub mod records;
pub mod sweeper;

pub use availability::AvailabilityService;
pub use catalog::CatalogService;
pub use deadline::with_deadline;
pub use generator::{GenerationReport, SlotGenerator, expand_schedule};
pub use records::{RecordManager, ReminderReport, reminder_message};
pub use sweeper::{ExpirySweeper, SweepReport};
