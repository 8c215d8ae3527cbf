/// Availability view DTOs
pub mod availability;
/// Reservation domain model and request/response types
pub mod reservation;
