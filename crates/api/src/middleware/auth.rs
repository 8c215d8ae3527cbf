//! # Caller Identity Module
//!
//! This module provides the authenticated-caller extractor for the Orienta
//! API. Authentication itself is owned by an upstream gateway; by the time a
//! request reaches this service, the gateway has verified the session and
//! forwarded the caller's identity in trusted headers:
//!
//! - `X-User-Id`: the caller's UUID
//! - `X-User-Role`: one of `student`, `advisor`, `admin`
//!
//! Every booking and availability endpoint requires this identity. Requests
//! with missing or malformed headers are rejected with an authentication
//! error before any handler logic runs.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use orienta_core::errors::BookingError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

/// The role a caller acts under, as asserted by the auth gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    Student,
    Advisor,
    Admin,
}

impl CallerRole {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(CallerRole::Student),
            "advisor" => Some(CallerRole::Advisor),
            "admin" => Some(CallerRole::Admin),
            _ => None,
        }
    }
}

/// The authenticated caller of a request.
///
/// Extracted from the gateway headers on every protected endpoint. Handlers
/// use it for ownership checks (a student may only cancel their own
/// reservation) and for scoping list queries.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub role: CallerRole,
}

impl CallerIdentity {
    /// Whether the caller may act on a reservation owned by `student_id`.
    pub fn may_act_on(&self, student_id: Uuid) -> bool {
        self.role == CallerRole::Admin
            || (self.role == CallerRole::Student && self.user_id == student_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(|| {
                AppError(BookingError::Authentication(
                    "Missing or invalid X-User-Id header".to_string(),
                ))
            })?;

        let role = parts
            .headers
            .get("X-User-Role")
            .and_then(|v| v.to_str().ok())
            .and_then(CallerRole::parse)
            .ok_or_else(|| {
                AppError(BookingError::Authentication(
                    "Missing or invalid X-User-Role header".to_string(),
                ))
            })?;

        Ok(CallerIdentity { user_id, role })
    }
}
