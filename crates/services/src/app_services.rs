use std::sync::Arc;

use exam_core::Clock;
use storage::repository::Storage;

use crate::attempt_service::TestAttemptService;
use crate::catalog_service::TestCatalogService;
use crate::error::AppServicesError;
use crate::practice_service::PracticeService;
use crate::result_service::ResultService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    attempts: Arc<TestAttemptService>,
    catalog: Arc<TestCatalogService>,
    practice: Arc<PracticeService>,
    results: Arc<ResultService>,
}

impl AppServices {
    /// Wire services over an already-opened storage backend.
    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        let attempts = Arc::new(TestAttemptService::new(
            clock,
            Arc::clone(&storage.tests),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.results),
        ));
        let catalog = Arc::new(TestCatalogService::new(clock, Arc::clone(&storage.tests)));
        let practice = Arc::new(PracticeService::new(Arc::clone(&storage.tests)));
        let results = Arc::new(ResultService::new(Arc::clone(&storage.results)));

        Self {
            attempts,
            catalog,
            practice,
            results,
        }
    }

    /// Build services backed by `SQLite` storage, running migrations first.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(clock, &storage))
    }

    #[must_use]
    pub fn attempts(&self) -> Arc<TestAttemptService> {
        Arc::clone(&self.attempts)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<TestCatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultService> {
        Arc::clone(&self.results)
    }
}
