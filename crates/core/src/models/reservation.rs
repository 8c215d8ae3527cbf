use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a reservation.
///
/// Only `scheduled` and `cancelled` are ever written to the store;
/// `in_progress` and `completed` are derived lazily at read time by
/// comparing the current time against the session window. Cancellation is
/// reachable only from `scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Derives the effective status from the stored status string and the
    /// session window. Unknown stored values are treated as `scheduled`,
    /// which then ages into `in_progress`/`completed` with the clock.
    pub fn derive(
        stored: &str,
        date: NaiveDate,
        slot: NaiveTime,
        duration_minutes: i32,
        now: DateTime<Utc>,
    ) -> Self {
        if stored == "cancelled" {
            return ReservationStatus::Cancelled;
        }
        let (start, end) = session_window(date, slot, duration_minutes);
        if now >= end {
            ReservationStatus::Completed
        } else if now >= start {
            ReservationStatus::InProgress
        } else {
            ReservationStatus::Scheduled
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Scheduled => "scheduled",
            ReservationStatus::InProgress => "in_progress",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

/// The UTC start and end instants of a session booked at `date`/`slot`.
pub fn session_window(
    date: NaiveDate,
    slot: NaiveTime,
    duration_minutes: i32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(slot).and_utc();
    (start, start + Duration::minutes(duration_minutes as i64))
}

/// One booked guidance session, as exposed to API consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub date: NaiveDate,
    pub slot: NaiveTime,
    pub duration_minutes: i32,
    pub student_id: Uuid,
    pub advisor_id: Uuid,
    pub status: ReservationStatus,
    pub note: Option<String>,
    pub meeting_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub date: NaiveDate,
    pub slot: NaiveTime,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelReservationResponse {
    pub id: Uuid,
    pub status: ReservationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReservationsResponse {
    pub reservations: Vec<Reservation>,
}
