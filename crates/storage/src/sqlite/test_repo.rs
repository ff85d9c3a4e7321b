use sqlx::Row;

use exam_core::model::{Bilingual, Test, TestId};

use super::SqliteRepository;
use super::mapping::{
    id_i64, map_question_row, options_to_json, parse_status, ser, test_id_from_i64, u32_from_i64,
};
use crate::repository::{StorageError, TestRepository};

impl SqliteRepository {
    async fn load_questions(&self, test_id: i64) -> Result<Vec<exam_core::model::Question>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, prompt_en, prompt_hi, options_en, options_hi,
                       correct, explanation_en, explanation_hi, section
                FROM questions
                WHERE test_id = ?1
                ORDER BY position ASC
            ",
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(map_question_row(&row)?);
        }
        Ok(questions)
    }

    async fn assemble_test(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Test, StorageError> {
        let id: i64 = row.try_get("id").map_err(ser)?;
        let questions = self.load_questions(id).await?;

        let title = Bilingual::new(
            row.try_get::<String, _>("title_en").map_err(ser)?,
            row.try_get::<String, _>("title_hi").map_err(ser)?,
        )
        .map_err(ser)?;

        let duration: i64 = row.try_get("duration_minutes").map_err(ser)?;
        let status = parse_status(&row.try_get::<String, _>("status").map_err(ser)?)?;

        Test::new(
            test_id_from_i64(id)?,
            title,
            questions,
            u32_from_i64("duration_minutes", duration)?,
            row.try_get("marks_per_question").map_err(ser)?,
            row.try_get("negative_marking").map_err(ser)?,
            status,
            row.try_get("published_at").map_err(ser)?,
            row.try_get("expires_at").map_err(ser)?,
            row.try_get("created_at").map_err(ser)?,
        )
        .map_err(ser)
    }
}

#[async_trait::async_trait]
impl TestRepository for SqliteRepository {
    async fn upsert_test(&self, test: &Test) -> Result<(), StorageError> {
        let test_id = id_i64("test_id", test.id().value())?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query(
            r"
                INSERT INTO tests (
                    id, title_en, title_hi, duration_minutes, marks_per_question,
                    negative_marking, status, published_at, expires_at, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ON CONFLICT(id) DO UPDATE SET
                    title_en = excluded.title_en,
                    title_hi = excluded.title_hi,
                    duration_minutes = excluded.duration_minutes,
                    marks_per_question = excluded.marks_per_question,
                    negative_marking = excluded.negative_marking,
                    status = excluded.status,
                    published_at = excluded.published_at,
                    expires_at = excluded.expires_at,
                    created_at = excluded.created_at
            ",
        )
        .bind(test_id)
        .bind(test.title().english())
        .bind(test.title().hindi())
        .bind(i64::from(test.duration_minutes()))
        .bind(test.marks_per_question())
        .bind(test.negative_marking())
        .bind(test.status().as_str())
        .bind(test.published_at())
        .bind(test.expires_at())
        .bind(test.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        // Replace the question list wholesale; a test's questions are
        // immutable once published, so this only matters for drafts/seeds.
        sqlx::query("DELETE FROM questions WHERE test_id = ?1")
            .bind(test_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for (position, question) in test.questions().iter().enumerate() {
            let options_en = options_to_json(question, Bilingual::english)?;
            let options_hi = options_to_json(question, Bilingual::hindi)?;
            sqlx::query(
                r"
                    INSERT INTO questions (
                        id, test_id, position, prompt_en, prompt_hi,
                        options_en, options_hi, correct,
                        explanation_en, explanation_hi, section
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                ",
            )
            .bind(id_i64("question_id", question.id().value())?)
            .bind(test_id)
            .bind(position as i64)
            .bind(question.prompt().english())
            .bind(question.prompt().hindi())
            .bind(options_en)
            .bind(options_hi)
            .bind(question.correct().as_str())
            .bind(question.explanation().map(Bilingual::english))
            .bind(question.explanation().map(Bilingual::hindi))
            .bind(question.section())
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    async fn get_test(&self, id: TestId) -> Result<Option<Test>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, title_en, title_hi, duration_minutes, marks_per_question,
                       negative_marking, status, published_at, expires_at, created_at
                FROM tests
                WHERE id = ?1
            ",
        )
        .bind(id_i64("test_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(self.assemble_test(&row).await?)),
            None => Ok(None),
        }
    }

    async fn list_published(&self, limit: u32) -> Result<Vec<Test>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, title_en, title_hi, duration_minutes, marks_per_question,
                       negative_marking, status, published_at, expires_at, created_at
                FROM tests
                WHERE status = 'published'
                ORDER BY created_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut tests = Vec::with_capacity(rows.len());
        for row in rows {
            tests.push(self.assemble_test(&row).await?);
        }
        Ok(tests)
    }
}
