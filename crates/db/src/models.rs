use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A reservation row. `status` only ever holds `scheduled` or `cancelled`;
/// the in-progress/completed states are derived at read time in the core
/// crate. Cancelled rows are kept for the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
    pub id: Uuid,
    pub date: NaiveDate,
    pub slot: NaiveTime,
    pub duration_minutes: i32,
    pub student_id: Uuid,
    pub advisor_id: Uuid,
    pub status: String,
    pub note: Option<String>,
    pub meeting_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAdvisor {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
