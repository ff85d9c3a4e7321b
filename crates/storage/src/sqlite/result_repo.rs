use sqlx::Row;

use exam_core::model::{TestResult, UserAnswer, UserId};

use super::SqliteRepository;
use super::mapping::{
    id_i64, ser, test_id_from_i64, u32_from_i64, user_id_from_str, user_id_to_string,
};
use crate::repository::{ResultId, ResultRepository, ResultRow, StorageError};

fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<ResultRow, StorageError> {
    let answers: Vec<UserAnswer> =
        serde_json::from_str(&row.try_get::<String, _>("answers").map_err(ser)?).map_err(ser)?;

    let result = TestResult::from_persisted(
        test_id_from_i64(row.try_get::<i64, _>("test_id").map_err(ser)?)?,
        row.try_get("score").map_err(ser)?,
        row.try_get("total_possible").map_err(ser)?,
        u32_from_i64(
            "correct_count",
            row.try_get::<i64, _>("correct_count").map_err(ser)?,
        )?,
        u32_from_i64(
            "incorrect_count",
            row.try_get::<i64, _>("incorrect_count").map_err(ser)?,
        )?,
        u32_from_i64(
            "unattempted_count",
            row.try_get::<i64, _>("unattempted_count").map_err(ser)?,
        )?,
        row.try_get("percentage").map_err(ser)?,
        u32_from_i64(
            "time_taken_seconds",
            row.try_get::<i64, _>("time_taken_seconds").map_err(ser)?,
        )?,
        answers,
        row.try_get("submitted_at").map_err(ser)?,
    );

    Ok(ResultRow {
        id: row.try_get("id").map_err(ser)?,
        user_id: user_id_from_str(&row.try_get::<String, _>("user_id").map_err(ser)?)?,
        result,
    })
}

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn append_result(
        &self,
        user: UserId,
        result: &TestResult,
    ) -> Result<ResultId, StorageError> {
        let answers = serde_json::to_string(result.answers()).map_err(ser)?;

        let res = sqlx::query(
            r"
                INSERT INTO results (
                    user_id, test_id, score, total_possible,
                    correct_count, incorrect_count, unattempted_count,
                    percentage, time_taken_seconds, answers, submitted_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
        )
        .bind(user_id_to_string(user))
        .bind(id_i64("test_id", result.test_id().value())?)
        .bind(result.score())
        .bind(result.total_possible())
        .bind(i64::from(result.correct_count()))
        .bind(i64::from(result.incorrect_count()))
        .bind(i64::from(result.unattempted_count()))
        .bind(result.percentage())
        .bind(i64::from(result.time_taken_seconds()))
        .bind(answers)
        .bind(result.submitted_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn get_result(&self, id: ResultId) -> Result<ResultRow, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, user_id, test_id, score, total_possible,
                       correct_count, incorrect_count, unattempted_count,
                       percentage, time_taken_seconds, answers, submitted_at
                FROM results
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_result_row(&row)
    }

    async fn list_results(
        &self,
        user: UserId,
        limit: u32,
    ) -> Result<Vec<ResultRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, user_id, test_id, score, total_possible,
                       correct_count, incorrect_count, unattempted_count,
                       percentage, time_taken_seconds, answers, submitted_at
                FROM results
                WHERE user_id = ?1
                ORDER BY submitted_at DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(user_id_to_string(user))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row(&row)?);
        }
        Ok(out)
    }
}
