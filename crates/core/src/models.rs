pub mod catalog;
pub mod notification;
pub mod record;
pub mod schedule;
pub mod slot;
