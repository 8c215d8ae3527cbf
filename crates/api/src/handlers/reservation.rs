//! # Reservation Handlers
//!
//! The lifecycle manager for booked sessions: create, cancel, and list.
//!
//! ## State machine
//!
//! - `scheduled` — initial state after a successful booking
//! - `in_progress` — the session window has started
//! - `completed` — the session window has passed (terminal)
//! - `cancelled` — terminal, reachable only from `scheduled`, and only by
//!   the owning student or an administrator
//!
//! Only `scheduled` and `cancelled` are ever stored; the time-driven states
//! are derived on read by `ReservationStatus::derive`, so there is no
//! background sweep to run and no stored state to go stale.
//!
//! ## Double-booking
//!
//! The create path validates against an availability snapshot, then relies
//! on the partial unique index on (date, slot) for the authoritative check:
//! the insert either commits the single winner or returns no row, which is
//! surfaced to the loser as a retryable conflict.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Duration, Utc};
use orienta_core::{
    catalog::{LEAD_TIME_MINUTES, SLOT_DURATION_MINUTES},
    errors::BookingError,
    models::reservation::{
        CancelReservationResponse, CreateReservationRequest, ListReservationsResponse,
        Reservation, ReservationStatus, session_window,
    },
};
use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        auth::{CallerIdentity, CallerRole},
        error_handling::AppError,
    },
    ApiState,
};

use orienta_db::models::DbReservation;

/// Books a slot for the calling student
///
/// # Endpoint
///
/// ```text
/// POST /api/reservations
/// { "date": "2026-09-01", "slot": "09:00:00", "note": "..." }
/// ```
///
/// Validation order: working day and not past, slot in the catalog, slot
/// not inside today's lead-time buffer, then the atomic insert. A lost race
/// returns 409 and the client is expected to re-fetch availability.
#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<Json<Reservation>, AppError> {
    if caller.role != CallerRole::Student {
        return Err(AppError(BookingError::Authorization(
            "Only students can book sessions".to_string(),
        )));
    }

    let now = Utc::now();
    let today = now.date_naive();

    if !state.catalog.is_working_day(payload.date) {
        return Err(AppError(BookingError::Validation(format!(
            "{} is not a working day",
            payload.date
        ))));
    }

    if payload.date < today {
        return Err(AppError(BookingError::Validation(format!(
            "{} is in the past",
            payload.date
        ))));
    }

    if !state.catalog.contains(payload.slot) {
        return Err(AppError(BookingError::Validation(format!(
            "{} is not a bookable slot",
            payload.slot
        ))));
    }

    // Same-day lead-time rule, mirroring the availability view
    let (start, _) = session_window(payload.date, payload.slot, SLOT_DURATION_MINUTES as i32);
    if start <= now + Duration::minutes(LEAD_TIME_MINUTES) {
        return Err(AppError(BookingError::Validation(format!(
            "Slot {} is no longer bookable today",
            payload.slot
        ))));
    }

    // Single advisor pool: assign whoever has the lightest day
    let advisor_id = orienta_db::repositories::advisor::least_loaded_advisor(
        &state.db_pool,
        payload.date,
    )
    .await
    .map_err(BookingError::Database)?
    .ok_or_else(|| {
        AppError(BookingError::Internal(
            "No active advisors configured".into(),
        ))
    })?;

    let meeting_url = generate_meeting_url(&state.meeting_url_base);

    // The atomic check-and-insert: the partial unique index decides the
    // winner when two students race for the same slot
    let db_reservation = orienta_db::repositories::reservation::create_reservation(
        &state.db_pool,
        payload.date,
        payload.slot,
        SLOT_DURATION_MINUTES as i32,
        caller.user_id,
        advisor_id,
        payload.note.as_deref(),
        &meeting_url,
    )
    .await
    .map_err(BookingError::Database)?
    .ok_or_else(|| {
        AppError(BookingError::Conflict(format!(
            "{} {}",
            payload.date, payload.slot
        )))
    })?;

    Ok(Json(to_reservation(db_reservation)))
}

/// Cancels a scheduled reservation
///
/// # Endpoint
///
/// ```text
/// DELETE /api/reservations/:id
/// ```
///
/// Allowed for the owning student or an administrator, and only while the
/// reservation still derives to `scheduled`. The freed slot is immediately
/// re-bookable.
#[axum::debug_handler]
pub async fn cancel_reservation(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelReservationResponse>, AppError> {
    let db_reservation =
        orienta_db::repositories::reservation::get_reservation_by_id(&state.db_pool, id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                AppError(BookingError::NotFound(format!(
                    "Reservation with ID {} not found",
                    id
                )))
            })?;

    if !caller.may_act_on(db_reservation.student_id) {
        return Err(AppError(BookingError::Authorization(
            "Reservation belongs to another student".to_string(),
        )));
    }

    let status = ReservationStatus::derive(
        &db_reservation.status,
        db_reservation.date,
        db_reservation.slot,
        db_reservation.duration_minutes,
        Utc::now(),
    );
    if status != ReservationStatus::Scheduled {
        return Err(AppError(BookingError::InvalidTransition(format!(
            "Cannot cancel a reservation in {} status",
            status.as_str()
        ))));
    }

    // The update is guarded on stored status, so a concurrent cancel of the
    // same row leaves exactly one writer with the transition
    let cancelled =
        orienta_db::repositories::reservation::cancel_reservation(&state.db_pool, id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                AppError(BookingError::InvalidTransition(
                    "Reservation is no longer cancellable".to_string(),
                ))
            })?;

    Ok(Json(CancelReservationResponse {
        id: cancelled.id,
        status: ReservationStatus::Cancelled,
    }))
}

/// Lists the caller's reservations
///
/// # Endpoint
///
/// ```text
/// GET /api/reservations
/// ```
///
/// Students see their own bookings, advisors the sessions assigned to them,
/// ordered by date and slot ascending. An empty history is an empty list,
/// never an error.
#[axum::debug_handler]
pub async fn list_reservations(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
) -> Result<Json<ListReservationsResponse>, AppError> {
    let rows = match caller.role {
        CallerRole::Advisor => {
            orienta_db::repositories::reservation::get_reservations_by_advisor(
                &state.db_pool,
                caller.user_id,
            )
            .await
        }
        // Admins book like anyone else; their own history is what "my
        // reservations" means for them
        CallerRole::Student | CallerRole::Admin => {
            orienta_db::repositories::reservation::get_reservations_by_student(
                &state.db_pool,
                caller.user_id,
            )
            .await
        }
    }
    .map_err(BookingError::Database)?;

    Ok(Json(ListReservationsResponse {
        reservations: rows.into_iter().map(to_reservation).collect(),
    }))
}

/// Returns a single reservation
///
/// # Endpoint
///
/// ```text
/// GET /api/reservations/:id
/// ```
///
/// Visible to the owning student, the assigned advisor, and administrators.
#[axum::debug_handler]
pub async fn get_reservation(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let db_reservation =
        orienta_db::repositories::reservation::get_reservation_by_id(&state.db_pool, id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                AppError(BookingError::NotFound(format!(
                    "Reservation with ID {} not found",
                    id
                )))
            })?;

    let is_assigned_advisor =
        caller.role == CallerRole::Advisor && caller.user_id == db_reservation.advisor_id;
    if !caller.may_act_on(db_reservation.student_id) && !is_assigned_advisor {
        return Err(AppError(BookingError::Authorization(
            "Reservation belongs to another student".to_string(),
        )));
    }

    Ok(Json(to_reservation(db_reservation)))
}

/// Converts a stored row into the API model, deriving the effective status
/// from the current time.
fn to_reservation(row: DbReservation) -> Reservation {
    let status = ReservationStatus::derive(
        &row.status,
        row.date,
        row.slot,
        row.duration_minutes,
        Utc::now(),
    );

    Reservation {
        id: row.id,
        date: row.date,
        slot: row.slot,
        duration_minutes: row.duration_minutes,
        student_id: row.student_id,
        advisor_id: row.advisor_id,
        status,
        note: row.note,
        meeting_url: row.meeting_url,
        created_at: row.created_at,
    }
}

/// Generates a fresh session link under the configured base URL.
fn generate_meeting_url(base: &str) -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("{}/{}", base.trim_end_matches('/'), code)
}
