use std::sync::Arc;

use exam_core::model::{PracticeSession, Test, TestId};
use storage::repository::TestRepository;

use crate::error::PracticeError;

/// Starts practice runs. Practice attempts are untimed, give immediate
/// feedback and are never persisted, so the service only loads the test.
#[derive(Clone)]
pub struct PracticeService {
    tests: Arc<dyn TestRepository>,
}

impl PracticeService {
    #[must_use]
    pub fn new(tests: Arc<dyn TestRepository>) -> Self {
        Self { tests }
    }

    /// Load the test and hand back a fresh practice session.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::TestNotFound` when the test is missing and
    /// `PracticeError::Storage` on load failure.
    pub async fn start(&self, test_id: TestId) -> Result<(Test, PracticeSession), PracticeError> {
        let test = self
            .tests
            .get_test(test_id)
            .await?
            .ok_or(PracticeError::TestNotFound(test_id))?;
        let session = PracticeSession::start(&test);
        Ok((test, session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Bilingual, OptionKey, Question, QuestionId, TestStatus};
    use exam_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            Bilingual::english_only(format!("Q{id}")).unwrap(),
            [
                Bilingual::english_only("a").unwrap(),
                Bilingual::english_only("b").unwrap(),
                Bilingual::english_only("c").unwrap(),
                Bilingual::english_only("d").unwrap(),
            ],
            OptionKey::C,
            None,
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn start_returns_fresh_session_sized_to_the_test() {
        let repo = InMemoryRepository::new();
        let test = Test::new(
            TestId::new(1),
            Bilingual::english_only("Practice me").unwrap(),
            vec![build_question(1), build_question(2)],
            10,
            1.0,
            0.0,
            TestStatus::Published,
            None,
            None,
            fixed_now(),
        )
        .unwrap();
        repo.upsert_test(&test).await.unwrap();

        let svc = PracticeService::new(Arc::new(repo));
        let (loaded, session) = svc.start(test.id()).await.unwrap();
        assert_eq!(loaded, test);
        assert_eq!(session.question_count(), 2);
        assert!(!session.is_complete());

        let err = svc.start(TestId::new(9)).await.unwrap_err();
        assert!(matches!(err, PracticeError::TestNotFound(_)));
    }
}
