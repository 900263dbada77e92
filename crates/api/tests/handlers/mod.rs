mod admin_test;
mod catalog_test;
mod error_test;
mod record_test;
mod schedule_test;
mod slot_test;
