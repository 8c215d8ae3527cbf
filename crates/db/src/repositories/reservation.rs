use crate::models::DbReservation;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Inserts a new reservation in `scheduled` status.
///
/// Returns `None` when the (date, slot) pair already carries a non-cancelled
/// reservation: the insert races against the partial unique index, so under
/// two concurrent attempts exactly one caller gets a row and the other gets
/// `None`. The availability check the caller did beforehand is advisory
/// only; this is the authoritative one.
pub async fn create_reservation(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    slot: NaiveTime,
    duration_minutes: i32,
    student_id: Uuid,
    advisor_id: Uuid,
    note: Option<&str>,
    meeting_url: &str,
) -> Result<Option<DbReservation>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating reservation: id={}, date={}, slot={}, student={}",
        id, date, slot, student_id
    );

    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        INSERT INTO reservations
            (id, date, slot, duration_minutes, student_id, advisor_id, status, note, meeting_url, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'scheduled', $7, $8, $9)
        ON CONFLICT (date, slot) WHERE status <> 'cancelled' DO NOTHING
        RETURNING id, date, slot, duration_minutes, student_id, advisor_id,
                  status, note, meeting_url, created_at, cancelled_at
        "#,
    )
    .bind(id)
    .bind(date)
    .bind(slot)
    .bind(duration_minutes)
    .bind(student_id)
    .bind(advisor_id)
    .bind(note)
    .bind(meeting_url)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    if reservation.is_some() {
        tracing::debug!("Reservation created successfully: id={}", id);
    } else {
        tracing::debug!("Slot already taken: date={}, slot={}", date, slot);
    }

    Ok(reservation)
}

pub async fn get_reservation_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbReservation>> {
    tracing::debug!("Getting reservation by id: {}", id);

    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, date, slot, duration_minutes, student_id, advisor_id,
               status, note, meeting_url, created_at, cancelled_at
        FROM reservations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(reservation)
}

/// The slot start times already taken on `date`. This is the existence set
/// consulted by every availability read and every booking attempt.
pub async fn get_reserved_slots(pool: &Pool<Postgres>, date: NaiveDate) -> Result<Vec<NaiveTime>> {
    let slots = sqlx::query_scalar::<_, NaiveTime>(
        r#"
        SELECT slot
        FROM reservations
        WHERE date = $1 AND status <> 'cancelled'
        ORDER BY slot ASC
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn get_reservations_by_date(
    pool: &Pool<Postgres>,
    date: NaiveDate,
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, date, slot, duration_minutes, student_id, advisor_id,
               status, note, meeting_url, created_at, cancelled_at
        FROM reservations
        WHERE date = $1
        ORDER BY slot ASC
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// Non-cancelled reservations over an inclusive date range, for the month
/// rollup: one query covers the whole calendar view.
pub async fn get_reservations_in_range(
    pool: &Pool<Postgres>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, date, slot, duration_minutes, student_id, advisor_id,
               status, note, meeting_url, created_at, cancelled_at
        FROM reservations
        WHERE date >= $1 AND date <= $2 AND status <> 'cancelled'
        ORDER BY date ASC, slot ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

pub async fn get_reservations_by_student(
    pool: &Pool<Postgres>,
    student_id: Uuid,
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, date, slot, duration_minutes, student_id, advisor_id,
               status, note, meeting_url, created_at, cancelled_at
        FROM reservations
        WHERE student_id = $1
        ORDER BY date ASC, slot ASC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

pub async fn get_reservations_by_advisor(
    pool: &Pool<Postgres>,
    advisor_id: Uuid,
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, date, slot, duration_minutes, student_id, advisor_id,
               status, note, meeting_url, created_at, cancelled_at
        FROM reservations
        WHERE advisor_id = $1
        ORDER BY date ASC, slot ASC
        "#,
    )
    .bind(advisor_id)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// Guard clauses: stored status must still be `scheduled` and the session
/// must not have started yet. The handler derives status before calling in,
/// but the session can start between that read and this write; checking the
/// start time in the UPDATE itself closes that window.
const CANCEL_RESERVATION_SQL: &str = r#"
    UPDATE reservations
    SET status = 'cancelled', cancelled_at = NOW()
    WHERE id = $1
      AND status = 'scheduled'
      AND (date + slot) > (NOW() AT TIME ZONE 'UTC')
    RETURNING id, date, slot, duration_minutes, student_id, advisor_id,
              status, note, meeting_url, created_at, cancelled_at
    "#;

/// Marks a reservation cancelled. Returns `None` when the row is no longer
/// cancellable. The freed slot is immediately re-bookable because the
/// partial unique index ignores cancelled rows.
pub async fn cancel_reservation(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbReservation>> {
    tracing::debug!("Cancelling reservation: id={}", id);

    let reservation = sqlx::query_as::<_, DbReservation>(CANCEL_RESERVATION_SQL)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(reservation)
}
