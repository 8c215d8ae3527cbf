use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockall::predicate;
use orienta_api::middleware::error_handling::AppError;
use orienta_core::availability::{DayStatus, available_slots, month_availability};
use orienta_core::catalog::SlotCatalog;
use orienta_core::errors::BookingError;
use orienta_core::models::availability::{DaySlotsResponse, MonthAvailabilityResponse};
use uuid::Uuid;

use crate::test_utils::{TestContext, at, d, scheduled_row, t};

// Test wrapper that mirrors the day-slots handler against mock repositories
async fn test_day_slots_wrapper(
    ctx: &mut TestContext,
    catalog: &SlotCatalog,
    date: &str,
    now: DateTime<Utc>,
) -> Result<DaySlotsResponse, AppError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        AppError(BookingError::Validation(format!(
            "Invalid date format: {}. Expected YYYY-MM-DD",
            date
        )))
    })?;

    if !catalog.is_working_day(date) {
        return Ok(DaySlotsResponse {
            date,
            slots: Vec::new(),
        });
    }

    let reserved = ctx.reservation_repo.get_reserved_slots(date).await?;
    let slots = available_slots(catalog, date, &reserved, now);

    Ok(DaySlotsResponse { date, slots })
}

// Test wrapper that mirrors the month-availability handler
async fn test_month_availability_wrapper(
    ctx: &mut TestContext,
    catalog: &SlotCatalog,
    year: i32,
    month: u32,
    now: DateTime<Utc>,
) -> Result<MonthAvailabilityResponse, AppError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AppError(BookingError::Validation(format!(
            "Invalid year/month: {}/{}",
            year, month
        )))
    })?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    let last = next.pred_opt().unwrap();

    let reservations = ctx
        .reservation_repo
        .get_reservations_in_range(first, last)
        .await?;

    let mut reserved_by_date: HashMap<NaiveDate, Vec<NaiveTime>> = HashMap::new();
    for row in reservations {
        reserved_by_date.entry(row.date).or_default().push(row.slot);
    }

    let days = month_availability(catalog, year, month, &reserved_by_date, now).ok_or_else(|| {
        AppError(BookingError::Validation(format!(
            "Invalid year/month: {}/{}",
            year, month
        )))
    })?;

    Ok(MonthAvailabilityResponse { year, month, days })
}

// Monday 2026-08-31 at 08:00 UTC
fn clock() -> DateTime<Utc> {
    at(d(2026, 8, 31), 8, 0)
}

#[tokio::test]
async fn test_day_slots_rejects_malformed_date() {
    let mut ctx = TestContext::new();
    let catalog = SlotCatalog::new();

    let err = test_day_slots_wrapper(&mut ctx, &catalog, "01/09/2026", clock())
        .await
        .expect_err("malformed date");

    assert!(matches!(err.0, BookingError::Validation(_)));
}

#[tokio::test]
async fn test_day_slots_closed_day_skips_the_store() {
    let mut ctx = TestContext::new();
    let catalog = SlotCatalog::new();

    // No expectation on get_reserved_slots: a weekend never touches the store
    let response = test_day_slots_wrapper(&mut ctx, &catalog, "2026-09-05", clock())
        .await
        .expect("closed day is not an error");

    assert!(response.slots.is_empty());
}

#[tokio::test]
async fn test_day_slots_subtracts_reservations() {
    let mut ctx = TestContext::new();
    let catalog = SlotCatalog::new();
    let date = d(2026, 9, 1);

    ctx.reservation_repo
        .expect_get_reserved_slots()
        .with(predicate::eq(date))
        .returning(|_| Ok(vec![t(9, 0), t(16, 0)]));

    let response = test_day_slots_wrapper(&mut ctx, &catalog, "2026-09-01", clock())
        .await
        .expect("day slots should succeed");

    assert_eq!(response.slots.len(), 8);
    assert!(!response.slots.contains(&t(9, 0)));
    assert!(!response.slots.contains(&t(16, 0)));
    assert!(response.slots.contains(&t(10, 0)));
}

#[tokio::test]
async fn test_day_slots_empty_day_returns_whole_catalog() {
    let mut ctx = TestContext::new();
    let catalog = SlotCatalog::new();

    ctx.reservation_repo
        .expect_get_reserved_slots()
        .returning(|_| Ok(Vec::new()));

    let response = test_day_slots_wrapper(&mut ctx, &catalog, "2026-09-01", clock())
        .await
        .expect("day slots should succeed");

    assert_eq!(response.slots, catalog.slots().to_vec());
}

#[tokio::test]
async fn test_cancel_frees_the_slot_in_day_view() {
    let catalog = SlotCatalog::new();

    // Before cancellation the 09:00 slot is reserved...
    let mut ctx = TestContext::new();
    ctx.reservation_repo
        .expect_get_reserved_slots()
        .returning(|_| Ok(vec![t(9, 0)]));
    let before = test_day_slots_wrapper(&mut ctx, &catalog, "2026-09-01", clock())
        .await
        .unwrap();
    assert!(!before.slots.contains(&t(9, 0)));

    // ...after cancellation the store no longer reports it as taken
    let mut ctx = TestContext::new();
    ctx.reservation_repo
        .expect_get_reserved_slots()
        .returning(|_| Ok(Vec::new()));
    let after = test_day_slots_wrapper(&mut ctx, &catalog, "2026-09-01", clock())
        .await
        .unwrap();
    assert!(after.slots.contains(&t(9, 0)));
    assert_eq!(after.slots.len(), before.slots.len() + 1);
}

#[tokio::test]
async fn test_month_availability_rolls_up_range_query() {
    let mut ctx = TestContext::new();
    let catalog = SlotCatalog::new();
    let student = Uuid::new_v4();

    // One fully booked Tuesday, one partially booked Wednesday
    let mut rows = Vec::new();
    for slot in catalog.slots() {
        rows.push(scheduled_row(student, d(2026, 9, 1), *slot));
    }
    rows.push(scheduled_row(student, d(2026, 9, 2), t(9, 0)));
    let returned = rows.clone();

    ctx.reservation_repo
        .expect_get_reservations_in_range()
        .with(predicate::eq(d(2026, 9, 1)), predicate::eq(d(2026, 9, 30)))
        .returning(move |_, _| Ok(returned.clone()));

    let response = test_month_availability_wrapper(&mut ctx, &catalog, 2026, 9, clock())
        .await
        .expect("month rollup should succeed");

    assert_eq!(response.days.len(), 30);
    assert_eq!(response.days[&d(2026, 9, 1)], DayStatus::Full);
    assert_eq!(response.days[&d(2026, 9, 2)], DayStatus::Free);
    assert_eq!(response.days[&d(2026, 9, 5)], DayStatus::Closed);
    assert_eq!(response.days[&d(2026, 9, 6)], DayStatus::Closed);
}

#[tokio::test]
async fn test_month_availability_rejects_invalid_month() {
    let mut ctx = TestContext::new();
    let catalog = SlotCatalog::new();

    let err = test_month_availability_wrapper(&mut ctx, &catalog, 2026, 13, clock())
        .await
        .expect_err("month 13 is invalid");

    assert!(matches!(err.0, BookingError::Validation(_)));
}

#[tokio::test]
async fn test_month_availability_is_idempotent() {
    let catalog = SlotCatalog::new();

    let mut first_ctx = TestContext::new();
    first_ctx
        .reservation_repo
        .expect_get_reservations_in_range()
        .returning(|_, _| Ok(Vec::new()));
    let first = test_month_availability_wrapper(&mut first_ctx, &catalog, 2026, 9, clock())
        .await
        .unwrap();

    let mut second_ctx = TestContext::new();
    second_ctx
        .reservation_repo
        .expect_get_reservations_in_range()
        .returning(|_, _| Ok(Vec::new()));
    let second = test_month_availability_wrapper(&mut second_ctx, &catalog, 2026, 9, clock())
        .await
        .unwrap();

    assert_eq!(first.days, second.days);
}
