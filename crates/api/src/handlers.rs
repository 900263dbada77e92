pub mod admin;
pub mod catalog;
pub mod record;
pub mod schedule;
pub mod slot;
