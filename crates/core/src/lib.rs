//! # Orienta Core
//!
//! Domain types and pure booking logic for the Orienta career-guidance
//! appointment service. This crate has no I/O: the slot catalog and the
//! availability calculators are plain functions over chrono values, so the
//! same rules apply identically in the API layer and in tests.

/// Day/month availability calculators
pub mod availability;
/// The fixed grid of bookable slots and the working-day rules
pub mod catalog;
/// Error taxonomy shared across all crates
pub mod errors;
/// Request/response and domain models
pub mod models;
