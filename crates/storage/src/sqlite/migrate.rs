use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema: tests, their questions, the per-user saved
/// session slot, submitted results, and indexes.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS tests (
                    id INTEGER PRIMARY KEY,
                    title_en TEXT NOT NULL,
                    title_hi TEXT NOT NULL,
                    duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
                    marks_per_question REAL NOT NULL CHECK (marks_per_question > 0),
                    negative_marking REAL NOT NULL CHECK (negative_marking >= 0),
                    status TEXT NOT NULL,
                    published_at TEXT,
                    expires_at TEXT,
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS questions (
                    id INTEGER NOT NULL,
                    test_id INTEGER NOT NULL,
                    position INTEGER NOT NULL CHECK (position >= 0),
                    prompt_en TEXT NOT NULL,
                    prompt_hi TEXT NOT NULL,
                    options_en TEXT NOT NULL,
                    options_hi TEXT NOT NULL,
                    correct TEXT NOT NULL CHECK (correct IN ('A', 'B', 'C', 'D')),
                    explanation_en TEXT,
                    explanation_hi TEXT,
                    section TEXT,
                    PRIMARY KEY (id, test_id),
                    FOREIGN KEY (test_id) REFERENCES tests(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        // One resumable attempt per user: the slot is the primary key.
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS saved_sessions (
                    user_id TEXT PRIMARY KEY,
                    test_id INTEGER NOT NULL,
                    state TEXT NOT NULL,
                    saved_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS results (
                    id INTEGER PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    test_id INTEGER NOT NULL,
                    score REAL NOT NULL,
                    total_possible REAL NOT NULL,
                    correct_count INTEGER NOT NULL CHECK (correct_count >= 0),
                    incorrect_count INTEGER NOT NULL CHECK (incorrect_count >= 0),
                    unattempted_count INTEGER NOT NULL CHECK (unattempted_count >= 0),
                    percentage REAL NOT NULL,
                    time_taken_seconds INTEGER NOT NULL CHECK (time_taken_seconds >= 0),
                    answers TEXT NOT NULL,
                    submitted_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_questions_test_position
                    ON questions (test_id, position);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_tests_status_created
                    ON tests (status, created_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_results_user_submitted
                    ON results (user_id, submitted_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
