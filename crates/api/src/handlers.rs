/// Month and day availability views
pub mod availability;
/// Reservation lifecycle: create, cancel, list
pub mod reservation;
