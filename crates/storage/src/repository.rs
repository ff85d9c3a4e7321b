use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use exam_core::model::{SessionState, Test, TestId, TestResult, TestStatus, UserId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Identifier assigned to a persisted result row.
pub type ResultId = i64;

/// A persisted result together with its row id.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub id: ResultId,
    pub user_id: UserId,
    pub result: TestResult,
}

/// The test that currently occupies a user's resumable-session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSession {
    pub test_id: TestId,
    pub saved_at: DateTime<Utc>,
}

/// Read (and seed-time write) access to test definitions.
///
/// The session engine treats tests as immutable: `get_test` must return a
/// fully-formed question list before an attempt starts.
#[async_trait]
pub trait TestRepository: Send + Sync {
    /// Persist or replace a test definition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the test cannot be stored.
    async fn upsert_test(&self, test: &Test) -> Result<(), StorageError>;

    /// Fetch a test with its questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure; a missing test is `Ok(None)`.
    async fn get_test(&self, id: TestId) -> Result<Option<Test>, StorageError>;

    /// List published tests, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    async fn list_published(&self, limit: u32) -> Result<Vec<Test>, StorageError>;
}

/// The durable session cache: one resumable attempt per user.
///
/// The slot is keyed by user alone; saving an attempt for a different test
/// replaces whatever occupied the slot. This mirrors the product's
/// single-slot resume behavior and is a known scalability limit, not a bug.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the saved state for `(user, test)`, if that pair owns the slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    async fn load_session(
        &self,
        user: UserId,
        test: TestId,
    ) -> Result<Option<SessionState>, StorageError>;

    /// Persist the state, replacing the user's slot. Called after every
    /// mutation, so implementations should keep it cheap.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be written.
    async fn save_session(
        &self,
        user: UserId,
        state: &SessionState,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Drop the user's slot. Called on successful submission only.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    async fn clear_session(&self, user: UserId) -> Result<(), StorageError>;

    /// Which test currently owns the user's slot, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    async fn active_session(&self, user: UserId) -> Result<Option<ActiveSession>, StorageError>;
}

/// The result sink: append-only record of submitted attempts.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a graded result and return its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(
        &self,
        user: UserId,
        result: &TestResult,
    ) -> Result<ResultId, StorageError>;

    /// Fetch a result by row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_result(&self, id: ResultId) -> Result<ResultRow, StorageError>;

    /// List a user's results, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    async fn list_results(&self, user: UserId, limit: u32)
    -> Result<Vec<ResultRow>, StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct SessionSlot {
    state: SessionState,
    saved_at: DateTime<Utc>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tests: Arc<Mutex<HashMap<TestId, Test>>>,
    sessions: Arc<Mutex<HashMap<UserId, SessionSlot>>>,
    results: Arc<Mutex<Vec<ResultRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TestRepository for InMemoryRepository {
    async fn upsert_test(&self, test: &Test) -> Result<(), StorageError> {
        let mut guard = self
            .tests
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(test.id(), test.clone());
        Ok(())
    }

    async fn get_test(&self, id: TestId) -> Result<Option<Test>, StorageError> {
        let guard = self
            .tests
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_published(&self, limit: u32) -> Result<Vec<Test>, StorageError> {
        let guard = self
            .tests
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut published: Vec<Test> = guard
            .values()
            .filter(|t| t.status() == TestStatus::Published)
            .cloned()
            .collect();
        published.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then(b.id().cmp(&a.id())));
        published.truncate(limit as usize);
        Ok(published)
    }
}

#[async_trait]
impl SessionStore for InMemoryRepository {
    async fn load_session(
        &self,
        user: UserId,
        test: TestId,
    ) -> Result<Option<SessionState>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(&user)
            .filter(|slot| slot.state.test_id() == test)
            .map(|slot| slot.state.clone()))
    }

    async fn save_session(
        &self,
        user: UserId,
        state: &SessionState,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            user,
            SessionSlot {
                state: state.clone(),
                saved_at,
            },
        );
        Ok(())
    }

    async fn clear_session(&self, user: UserId) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&user);
        Ok(())
    }

    async fn active_session(&self, user: UserId) -> Result<Option<ActiveSession>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&user).map(|slot| ActiveSession {
            test_id: slot.state.test_id(),
            saved_at: slot.saved_at,
        }))
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(
        &self,
        user: UserId,
        result: &TestResult,
    ) -> Result<ResultId, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = guard.len() as ResultId + 1;
        guard.push(ResultRow {
            id,
            user_id: user,
            result: result.clone(),
        });
        Ok(id)
    }

    async fn get_result(&self, id: ResultId) -> Result<ResultRow, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_results(
        &self,
        user: UserId,
        limit: u32,
    ) -> Result<Vec<ResultRow>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|row| row.user_id == user)
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub tests: Arc<dyn TestRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let tests: Arc<dyn TestRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionStore> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo);
        Self {
            tests,
            sessions,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Bilingual, OptionKey, Question, QuestionId};
    use exam_core::time::fixed_now;
    use chrono::Duration;

    fn build_test(id: u64, status: TestStatus) -> Test {
        let questions = (1..=2)
            .map(|qid| {
                Question::new(
                    QuestionId::new(qid),
                    Bilingual::english_only(format!("Q{qid}")).unwrap(),
                    [
                        Bilingual::english_only("a").unwrap(),
                        Bilingual::english_only("b").unwrap(),
                        Bilingual::english_only("c").unwrap(),
                        Bilingual::english_only("d").unwrap(),
                    ],
                    OptionKey::A,
                    None,
                    None,
                )
                .unwrap()
            })
            .collect();
        Test::new(
            TestId::new(id),
            Bilingual::english_only(format!("Test {id}")).unwrap(),
            questions,
            15,
            1.0,
            0.0,
            status,
            None,
            None,
            fixed_now() + Duration::minutes(id as i64),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_published_filters_drafts_and_orders_newest_first() {
        let repo = InMemoryRepository::new();
        repo.upsert_test(&build_test(1, TestStatus::Published))
            .await
            .unwrap();
        repo.upsert_test(&build_test(2, TestStatus::Draft))
            .await
            .unwrap();
        repo.upsert_test(&build_test(3, TestStatus::Published))
            .await
            .unwrap();

        let published = repo.list_published(10).await.unwrap();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].id(), TestId::new(3));
        assert_eq!(published[1].id(), TestId::new(1));
    }

    #[tokio::test]
    async fn session_slot_is_single_per_user() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let first = build_test(1, TestStatus::Published);
        let second = build_test(2, TestStatus::Published);

        let state_one = SessionState::start(&first);
        repo.save_session(user, &state_one, fixed_now())
            .await
            .unwrap();
        assert!(
            repo.load_session(user, first.id())
                .await
                .unwrap()
                .is_some()
        );

        // Starting the second test takes over the slot: the first attempt
        // is no longer resumable.
        let state_two = SessionState::start(&second);
        repo.save_session(user, &state_two, fixed_now())
            .await
            .unwrap();
        assert!(
            repo.load_session(user, first.id())
                .await
                .unwrap()
                .is_none()
        );
        let active = repo.active_session(user).await.unwrap().unwrap();
        assert_eq!(active.test_id, second.id());

        repo.clear_session(user).await.unwrap();
        assert!(repo.active_session(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn results_round_trip_and_list_by_user() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let other = UserId::random();
        let test = build_test(1, TestStatus::Published);
        let session = SessionState::start(&test);
        let result = TestResult::grade(&test, &session, fixed_now());

        let id = repo.append_result(user, &result).await.unwrap();
        let fetched = repo.get_result(id).await.unwrap();
        assert_eq!(fetched.result, result);
        assert_eq!(fetched.user_id, user);

        repo.append_result(other, &result).await.unwrap();
        let listed = repo.list_results(user, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);

        assert!(matches!(
            repo.get_result(999).await.unwrap_err(),
            StorageError::NotFound
        ));
    }
}
