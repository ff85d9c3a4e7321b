use std::sync::Arc;

use exam_core::model::UserId;
use services::{PracticeService, ResultService, TestAttemptService, TestCatalogService};

/// What the UI needs from the composition root: the signed-in identity and
/// the services built over one storage backend.
pub trait UiApp: Send + Sync {
    fn user_id(&self) -> UserId;

    fn attempts(&self) -> Arc<TestAttemptService>;
    fn catalog(&self) -> Arc<TestCatalogService>;
    fn practice(&self) -> Arc<PracticeService>;
    fn results(&self) -> Arc<ResultService>;
}

#[derive(Clone)]
pub struct AppContext {
    user_id: UserId,
    attempts: Arc<TestAttemptService>,
    catalog: Arc<TestCatalogService>,
    practice: Arc<PracticeService>,
    results: Arc<ResultService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            user_id: app.user_id(),
            attempts: app.attempts(),
            catalog: app.catalog(),
            practice: app.practice(),
            results: app.results(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
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

/// Build an `AppContext` from a UI-facing app implementation.
///
/// Provided by the application composition root (`crates/app`).
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
