use crate::models::DbAdvisor;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_advisor(
    pool: &Pool<Postgres>,
    display_name: &str,
    email: &str,
) -> Result<DbAdvisor> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating advisor: id={}, name={}", id, display_name);

    let advisor = sqlx::query_as::<_, DbAdvisor>(
        r#"
        INSERT INTO advisors (id, display_name, email, active, created_at)
        VALUES ($1, $2, $3, TRUE, $4)
        RETURNING id, display_name, email, active, created_at
        "#,
    )
    .bind(id)
    .bind(display_name)
    .bind(email)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(advisor)
}

pub async fn get_advisor_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAdvisor>> {
    let advisor = sqlx::query_as::<_, DbAdvisor>(
        r#"
        SELECT id, display_name, email, active, created_at
        FROM advisors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(advisor)
}

/// Picks the active advisor with the fewest non-cancelled reservations on
/// `date`. Single-pool assignment; ties break on seniority.
pub async fn least_loaded_advisor(pool: &Pool<Postgres>, date: NaiveDate) -> Result<Option<Uuid>> {
    let advisor_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT a.id
        FROM advisors a
        LEFT JOIN reservations r
            ON r.advisor_id = a.id AND r.date = $1 AND r.status <> 'cancelled'
        WHERE a.active
        GROUP BY a.id, a.created_at
        ORDER BY COUNT(r.id) ASC, a.created_at ASC
        LIMIT 1
        "#,
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(advisor_id)
}
