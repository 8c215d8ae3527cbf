use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Schema DDL, one command per entry. sqlx runs every query through the
/// extended protocol, which rejects multi-command strings, so each
/// statement must stand alone.
const SCHEMA_STATEMENTS: &[&str] = &[
    // Advisors table
    r#"
    CREATE TABLE IF NOT EXISTS advisors (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        display_name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL UNIQUE,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    )
    "#,
    // Reservations table
    r#"
    CREATE TABLE IF NOT EXISTS reservations (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        date DATE NOT NULL,
        slot TIME NOT NULL,
        duration_minutes INTEGER NOT NULL,
        student_id UUID NOT NULL,
        advisor_id UUID NOT NULL REFERENCES advisors(id),
        status VARCHAR(32) NOT NULL DEFAULT 'scheduled',
        note TEXT NULL,
        meeting_url TEXT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        cancelled_at TIMESTAMP WITH TIME ZONE NULL,
        CONSTRAINT valid_status CHECK (status IN ('scheduled', 'cancelled'))
    )
    "#,
    // At most one non-cancelled reservation per (date, slot). This partial
    // unique index is the mutual-exclusion guard for concurrent bookings:
    // two inserts for the same slot cannot both commit, regardless of how
    // many service instances are running.
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_reservations_active_slot
    ON reservations (date, slot)
    WHERE status <> 'cancelled'
    "#,
    // Supporting indexes
    r#"CREATE INDEX IF NOT EXISTS idx_reservations_date ON reservations(date)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_reservations_student_id ON reservations(student_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_reservations_advisor_id ON reservations(advisor_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_advisors_active ON advisors(active)"#,
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
