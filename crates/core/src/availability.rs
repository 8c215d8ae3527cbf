//! # Availability Calculators
//!
//! Pure derivations of bookable capacity from the slot catalog plus the set
//! of reserved slots. Nothing here is cached or persisted: a day's free
//! slots and a month's day statuses are recomputed from reservation rows on
//! every request, so the store stays the single source of truth.
//!
//! Both calculators take `now` explicitly rather than reading the clock, so
//! the same-day lead-time rule is deterministic under test.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{LEAD_TIME_MINUTES, SlotCatalog};

/// Derived classification of a calendar day's booking availability.
///
/// Never stored; computed on demand from reservations, the catalog and the
/// current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// At least one open slot
    Free,
    /// All slots taken (or no longer bookable today)
    Full,
    /// Non-working day
    Closed,
    /// Date earlier than today
    Past,
}

/// Computes the ordered subset of catalog slots still bookable on `date`.
///
/// Non-working days return the empty set. Already-reserved slots are
/// subtracted, and when `date` is today, slots starting at or before
/// `now + lead time` are dropped so a student cannot book a session about
/// to start. Past dates fall out naturally: every slot of an earlier day is
/// before the cutoff.
///
/// Read-only and idempotent; safe to call repeatedly.
pub fn available_slots(
    catalog: &SlotCatalog,
    date: NaiveDate,
    reserved: &[NaiveTime],
    now: DateTime<Utc>,
) -> Vec<NaiveTime> {
    if !catalog.is_working_day(date) {
        return Vec::new();
    }

    if date < now.date_naive() {
        return Vec::new();
    }

    // A slot is bookable only if its start lies strictly beyond the buffer.
    // Comparing full instants rather than times of day keeps the rule sound
    // near midnight; for future dates the cutoff is always behind the slot.
    let cutoff = now + Duration::minutes(LEAD_TIME_MINUTES);

    catalog
        .slots()
        .iter()
        .copied()
        .filter(|slot| !reserved.contains(slot))
        .filter(|slot| date.and_time(*slot).and_utc() > cutoff)
        .collect()
}

/// Classifies a single day for the month rollup.
pub fn day_status(
    catalog: &SlotCatalog,
    date: NaiveDate,
    reserved: &[NaiveTime],
    now: DateTime<Utc>,
) -> DayStatus {
    if !catalog.is_working_day(date) {
        return DayStatus::Closed;
    }
    if date < now.date_naive() {
        return DayStatus::Past;
    }
    if available_slots(catalog, date, reserved, now).is_empty() {
        DayStatus::Full
    } else {
        DayStatus::Free
    }
}

/// Rolls up [`day_status`] over every calendar day of a month.
///
/// `reserved_by_date` carries the non-cancelled reserved slots grouped by
/// date, typically from one range query. Days absent from the map are
/// treated as having no reservations. The result covers every day of the
/// month, closed days included, so a calendar renders from one request.
pub fn month_availability(
    catalog: &SlotCatalog,
    year: i32,
    month: u32,
    reserved_by_date: &HashMap<NaiveDate, Vec<NaiveTime>>,
    now: DateTime<Utc>,
) -> Option<BTreeMap<NaiveDate, DayStatus>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    let mut days = BTreeMap::new();
    let mut date = first;
    while date.month() == month {
        let reserved = reserved_by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        days.insert(date, day_status(catalog, date, reserved, now));
        date = date.succ_opt()?;
    }

    Some(days)
}
