use std::sync::Arc;

use exam_core::model::UserId;
use storage::repository::{ResultId, ResultRepository, ResultRow};

use crate::error::ResultLookupError;

/// Lookup over persisted attempt results.
#[derive(Clone)]
pub struct ResultService {
    results: Arc<dyn ResultRepository>,
}

impl ResultService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// Fetch one result by row id.
    ///
    /// # Errors
    ///
    /// Returns `ResultLookupError::Storage` when missing or on failure.
    pub async fn get_result(&self, id: ResultId) -> Result<ResultRow, ResultLookupError> {
        Ok(self.results.get_result(id).await?)
    }

    /// A user's recent results, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ResultLookupError::Storage` on failure.
    pub async fn list_results(
        &self,
        user: UserId,
        limit: u32,
    ) -> Result<Vec<ResultRow>, ResultLookupError> {
        Ok(self.results.list_results(user, limit).await?)
    }
}
