//! # Timeline Core
//!
//! Domain types and booking logic of the Timeline service: worker schedules,
//! generated slots, booking records and the periodic sweeps that keep them
//! consistent. Storage is reached only through the traits in
//! [`repositories`], so the services here never see SQL.

pub mod config;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;
