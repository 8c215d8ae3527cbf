/// Caller identity extraction from gateway headers
pub mod auth;
/// Error-to-response mapping
pub mod error_handling;
