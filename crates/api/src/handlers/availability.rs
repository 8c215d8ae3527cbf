//! # Availability Handlers
//!
//! This module contains the read side of the booking engine: the month-level
//! calendar rollup and the day-level slot list. Both are derived on every
//! request from reservation rows plus the slot catalog — nothing here is
//! cached, so the store stays the single source of truth.
//!
//! ## Month Rollup
//!
//! The month view answers "which days are worth clicking" in one request:
//!
//! 1. Fetch all non-cancelled reservations for the month with a single
//!    range query
//! 2. Group the reserved slots by date
//! 3. Classify every calendar day as `closed`, `past`, `full` or `free`
//!    with the pure calculator in `orienta-core`
//!
//! Results are advisory snapshots: they may go stale the moment another
//! student books, and that is fine — correctness is enforced by the atomic
//! insert in the create path, not by these reads.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use orienta_core::{
    availability::{available_slots, month_availability},
    errors::BookingError,
    models::availability::{DaySlotsResponse, MonthAvailabilityResponse},
};
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};

use crate::{
    middleware::{auth::CallerIdentity, error_handling::AppError},
    ApiState,
};

/// Query parameters for the month availability endpoint
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// Calendar year (e.g. 2026)
    pub year: i32,

    /// Calendar month, 1-12
    pub month: u32,
}

/// Query parameters for the day slots endpoint
#[derive(Debug, Deserialize)]
pub struct DayQuery {
    /// Calendar date in `YYYY-MM-DD` form
    pub date: String,
}

/// Returns the booking status of every day in a month
///
/// # Endpoint
///
/// ```text
/// GET /api/availability/month?year=2026&month=9
/// ```
///
/// Every day of the month appears in the response, weekends and holidays
/// included, so a calendar view needs exactly one request per month shown.
#[axum::debug_handler]
pub async fn get_month_availability(
    State(state): State<Arc<ApiState>>,
    _caller: CallerIdentity,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthAvailabilityResponse>, AppError> {
    let now = Utc::now();

    let (first, last) = month_bounds(query.year, query.month).ok_or_else(|| {
        AppError(BookingError::Validation(format!(
            "Invalid year/month: {}/{}",
            query.year, query.month
        )))
    })?;

    // One range query covers the whole calendar view
    let reservations = orienta_db::repositories::reservation::get_reservations_in_range(
        &state.db_pool,
        first,
        last,
    )
    .await
    .map_err(BookingError::Database)?;

    let mut reserved_by_date: HashMap<NaiveDate, Vec<chrono::NaiveTime>> = HashMap::new();
    for reservation in reservations {
        reserved_by_date
            .entry(reservation.date)
            .or_default()
            .push(reservation.slot);
    }

    let days = month_availability(&state.catalog, query.year, query.month, &reserved_by_date, now)
        .ok_or_else(|| {
            AppError(BookingError::Validation(format!(
                "Invalid year/month: {}/{}",
                query.year, query.month
            )))
        })?;

    Ok(Json(MonthAvailabilityResponse {
        year: query.year,
        month: query.month,
        days,
    }))
}

/// Returns the ordered list of slots still bookable on a single day
///
/// # Endpoint
///
/// ```text
/// GET /api/availability/day?date=2026-09-01
/// ```
///
/// Closed and past days return an empty list rather than an error. When the
/// requested date is today, slots starting inside the lead-time buffer are
/// excluded as well.
#[axum::debug_handler]
pub async fn get_day_slots(
    State(state): State<Arc<ApiState>>,
    _caller: CallerIdentity,
    Query(query): Query<DayQuery>,
) -> Result<Json<DaySlotsResponse>, AppError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d").map_err(|_| {
        AppError(BookingError::Validation(format!(
            "Invalid date format: {}. Expected YYYY-MM-DD",
            query.date
        )))
    })?;

    // Closed days skip the store entirely
    if !state.catalog.is_working_day(date) {
        return Ok(Json(DaySlotsResponse {
            date,
            slots: Vec::new(),
        }));
    }

    let reserved = orienta_db::repositories::reservation::get_reserved_slots(&state.db_pool, date)
        .await
        .map_err(BookingError::Database)?;

    let slots = available_slots(&state.catalog, date, &reserved, Utc::now());

    Ok(Json(DaySlotsResponse { date, slots }))
}

/// First and last day of a calendar month.
fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_month.pred_opt()?))
}
