//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Orienta API.
//! It maps domain-specific errors to appropriate HTTP status codes and JSON
//! error responses, ensuring a consistent error handling experience across
//! the entire API.
//!
//! The implementation is based on Axum's error handling mechanisms and integrates
//! with Orienta's custom error types. Every error body carries both a human
//! readable `error` message and a machine readable `kind`, so clients can
//! distinguish a retryable booking conflict from a validation failure without
//! parsing text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orienta_core::errors::BookingError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `BookingError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
///
/// # Example
///
/// ```ignore
/// async fn handler(id: Uuid) -> Result<Json<Reservation>, AppError> {
///     let reservation = repository.get_reservation(id)
///         .await
///         .map_err(|e| AppError(BookingError::NotFound(e.to_string())))?;
///
///     Ok(Json(reservation))
/// }
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

/// Converts application errors to HTTP responses
///
/// This implementation maps each error type to the appropriate HTTP status code
/// and formats the error message and kind into a JSON response body. The
/// conflict case maps to 409 so booking races surface as retryable to clients.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BookingError::Authorization(_) => StatusCode::FORBIDDEN,
            BookingError::InvalidTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let body = Json(json!({
            "error": self.0.to_string(),
            "kind": self.0.kind(),
        }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, BookingError>` in handler functions that return `Result<T, AppError>`.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, eyre::Report>` in handler functions that return `Result<T, AppError>`.
/// It wraps the eyre error in a BookingError::Database variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError to an HTTP response
///
/// This function is provided for code that directly maps errors outside of
/// a handler's `?` chain.
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}

/// Maps infrastructure errors escaping the middleware stack to responses
///
/// The timeout layer surfaces elapsed deadlines as a boxed error; anything
/// else from the stack is an internal failure. Used with
/// `axum::error_handling::HandleErrorLayer` when assembling the router.
pub async fn handle_middleware_error(err: tower::BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        let body = Json(json!({
            "error": "Request timed out",
            "kind": "timeout",
        }));
        (StatusCode::REQUEST_TIMEOUT, body).into_response()
    } else {
        let body = Json(json!({
            "error": format!("Internal server error: {}", err),
            "kind": "internal",
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
