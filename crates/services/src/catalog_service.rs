use std::sync::Arc;

use exam_core::Clock;
use exam_core::model::{Test, TestId};
use storage::repository::{StorageError, TestRepository};

/// Read-model over published tests for the home screen.
#[derive(Clone)]
pub struct TestCatalogService {
    clock: Clock,
    tests: Arc<dyn TestRepository>,
}

impl TestCatalogService {
    #[must_use]
    pub fn new(clock: Clock, tests: Arc<dyn TestRepository>) -> Self {
        Self { clock, tests }
    }

    /// Published tests whose publish/expiry window contains "now".
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    pub async fn list_open(&self, limit: u32) -> Result<Vec<Test>, StorageError> {
        let now = self.clock.now();
        let published = self.tests.list_published(limit).await?;
        Ok(published.into_iter().filter(|t| t.is_open(now)).collect())
    }

    /// Fetch one test definition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    pub async fn get_test(&self, id: TestId) -> Result<Option<Test>, StorageError> {
        self.tests.get_test(id).await
    }
}
