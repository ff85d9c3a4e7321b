use chrono::{DateTime, Utc};
use sqlx::Row;

use exam_core::model::{SessionState, TestId, UserId};

use super::SqliteRepository;
use super::mapping::{id_i64, ser, test_id_from_i64, user_id_to_string};
use crate::repository::{ActiveSession, SessionStore, StorageError};

#[async_trait::async_trait]
impl SessionStore for SqliteRepository {
    async fn load_session(
        &self,
        user: UserId,
        test: TestId,
    ) -> Result<Option<SessionState>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT state
                FROM saved_sessions
                WHERE user_id = ?1 AND test_id = ?2
            ",
        )
        .bind(user_id_to_string(user))
        .bind(id_i64("test_id", test.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => {
                let state: String = row.try_get("state").map_err(ser)?;
                Ok(Some(serde_json::from_str(&state).map_err(ser)?))
            }
            None => Ok(None),
        }
    }

    async fn save_session(
        &self,
        user: UserId,
        state: &SessionState,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_string(state).map_err(ser)?;
        sqlx::query(
            r"
                INSERT INTO saved_sessions (user_id, test_id, state, saved_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(user_id) DO UPDATE SET
                    test_id = excluded.test_id,
                    state = excluded.state,
                    saved_at = excluded.saved_at
            ",
        )
        .bind(user_id_to_string(user))
        .bind(id_i64("test_id", state.test_id().value())?)
        .bind(payload)
        .bind(saved_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn clear_session(&self, user: UserId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM saved_sessions WHERE user_id = ?1")
            .bind(user_id_to_string(user))
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn active_session(&self, user: UserId) -> Result<Option<ActiveSession>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT test_id, saved_at
                FROM saved_sessions
                WHERE user_id = ?1
            ",
        )
        .bind(user_id_to_string(user))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(ActiveSession {
                test_id: test_id_from_i64(row.try_get::<i64, _>("test_id").map_err(ser)?)?,
                saved_at: row.try_get("saved_at").map_err(ser)?,
            })),
            None => Ok(None),
        }
    }
}
