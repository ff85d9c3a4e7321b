use exam_core::model::{
    Language, OptionKey, Question, SessionState, SubmitSummary, Test, TickOutcome, UserId,
};
use exam_core::palette::{Indicator, Legend, legend, live_indicators};
use services::{AttemptEvent, StartedAttempt, TestAttemptService};

use crate::views::ViewError;

/// Everything the attempt screen can do to its session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptIntent {
    Select(OptionKey),
    ToggleMark,
    Next,
    Previous,
    Jump(usize),
    SetLanguage(Language),
}

impl AttemptIntent {
    fn to_event(self) -> AttemptEvent {
        match self {
            AttemptIntent::Select(option) => AttemptEvent::Select(option),
            AttemptIntent::ToggleMark => AttemptEvent::ToggleMark,
            AttemptIntent::Next => AttemptEvent::Next,
            AttemptIntent::Previous => AttemptEvent::Previous,
            AttemptIntent::Jump(index) => AttemptEvent::Jump(index),
            AttemptIntent::SetLanguage(language) => AttemptEvent::SetLanguage(language),
        }
    }
}

/// View-model owning one live attempt: the immutable test and the session
/// that every intent and timer tick flows through.
pub struct AttemptVm {
    test: Test,
    session: SessionState,
    resumed: bool,
}

impl AttemptVm {
    #[must_use]
    pub fn new(attempt: StartedAttempt) -> Self {
        Self {
            test: attempt.test,
            session: attempt.session,
            resumed: attempt.resumed,
        }
    }

    #[must_use]
    pub fn test(&self) -> &Test {
        &self.test
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.session.language()
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // The session index is clamped to the question list by construction.
        &self.test.questions()[self.session.current_index()]
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.session.question_count()
    }

    #[must_use]
    pub fn seconds_remaining(&self) -> u32 {
        self.session.seconds_remaining()
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<OptionKey> {
        self.session.current_answer().answer()
    }

    #[must_use]
    pub fn is_marked(&self) -> bool {
        self.session.current_answer().status().is_marked()
    }

    #[must_use]
    pub fn indicators(&self) -> Vec<Indicator> {
        live_indicators(self.session.answers())
    }

    #[must_use]
    pub fn legend(&self) -> Legend {
        legend(&self.indicators())
    }

    #[must_use]
    pub fn submit_summary(&self) -> SubmitSummary {
        SubmitSummary::from_session(&self.session)
    }

    /// Apply a user intent through the service so the slot is refreshed.
    pub async fn apply(&mut self, attempts: &TestAttemptService, user: UserId, intent: AttemptIntent) {
        attempts
            .apply(user, &mut self.session, intent.to_event())
            .await;
    }

    /// One countdown second.
    pub async fn tick(&mut self, attempts: &TestAttemptService, user: UserId) -> TickOutcome {
        attempts.tick(user, &mut self.session).await
    }

    /// Submit the attempt; the caller decides what to do with the result id.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the result sink rejects the write;
    /// state and slot are untouched so the submit can be retried.
    pub async fn submit(
        &self,
        attempts: &TestAttemptService,
        user: UserId,
    ) -> Result<i64, ViewError> {
        let submitted = attempts
            .submit(user, &self.test, &self.session)
            .await
            .map_err(|_| ViewError::Unknown)?;
        Ok(submitted.result_id)
    }
}

/// # Errors
///
/// Returns `ViewError::NotFound` when the test does not exist and
/// `ViewError::Unknown` for load failures. Both block entry to the screen.
pub async fn start_attempt(
    attempts: &TestAttemptService,
    user: UserId,
    test_id: u64,
) -> Result<AttemptVm, ViewError> {
    use exam_core::model::TestId;

    let attempt = match attempts.start_or_resume(user, TestId::new(test_id)).await {
        Ok(attempt) => attempt,
        Err(services::AttemptError::TestNotFound(_)) => return Err(ViewError::NotFound),
        Err(_) => return Err(ViewError::Unknown),
    };
    Ok(AttemptVm::new(attempt))
}
