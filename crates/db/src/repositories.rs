pub mod advisor;
pub mod reservation;
