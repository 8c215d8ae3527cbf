use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

/// Duration of every bookable session, in minutes. The grid is uniform: any
/// change to session length is a change here, not in the calculators.
pub const SLOT_DURATION_MINUTES: i64 = 60;

/// Minimum interval before a slot's start time during which that slot can no
/// longer be booked on the current day.
pub const LEAD_TIME_MINUTES: i64 = 60;

/// Slot start times for a working day: a morning shift and an
/// afternoon/evening shift, five hourly slots each.
const SLOT_GRID: [(u32, u32); 10] = [
    (9, 0),
    (10, 0),
    (11, 0),
    (12, 0),
    (13, 0),
    (16, 0),
    (17, 0),
    (18, 0),
    (19, 0),
    (20, 0),
];

/// The canonical list of bookable time-of-day slots for a working day.
///
/// The catalog is identical for every working day; weekends and configured
/// holidays have no slots at all. Slots are not persisted anywhere — the
/// catalog is the single source of the schedule grid, and availability is
/// always derived from it plus the reservation rows.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    slots: Vec<NaiveTime>,
    holidays: Vec<NaiveDate>,
}

impl SlotCatalog {
    /// Creates the catalog with the standard two-shift grid and no holidays.
    pub fn new() -> Self {
        Self::with_holidays(Vec::new())
    }

    /// Creates the catalog with the standard grid and a set of non-working
    /// dates in addition to weekends.
    pub fn with_holidays(holidays: Vec<NaiveDate>) -> Self {
        let slots = SLOT_GRID
            .iter()
            .map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
            .collect();
        Self { slots, holidays }
    }

    /// The ordered slot start times for a working day.
    pub fn slots(&self) -> &[NaiveTime] {
        &self.slots
    }

    /// Whether `slot` is one of the catalog's start times.
    pub fn contains(&self, slot: NaiveTime) -> bool {
        self.slots.contains(&slot)
    }

    /// End time of a session starting at `slot`.
    pub fn slot_end(&self, slot: NaiveTime) -> NaiveTime {
        slot + Duration::minutes(SLOT_DURATION_MINUTES)
    }

    /// Whether `date` is a day with bookable slots (non-weekend,
    /// non-holiday).
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::new()
    }
}
