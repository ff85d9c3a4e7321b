use std::sync::Arc;

use exam_core::Clock;
use exam_core::model::{
    Language, OptionKey, SessionState, SubmitSummary, Test, TestId, TestResult, TickOutcome,
    UserId,
};
use storage::repository::{
    ActiveSession, ResultId, ResultRepository, SessionStore, TestRepository,
};

use crate::error::{AttemptError, SubmitError};

/// A started (or resumed) timed attempt: the immutable test definition and
/// the mutable session state the caller now owns.
#[derive(Debug, Clone, PartialEq)]
pub struct StartedAttempt {
    pub test: Test,
    pub session: SessionState,
    pub resumed: bool,
}

/// Everything the UI mutates during a live attempt, as one event stream.
/// Timer ticks go through [`TestAttemptService::tick`] instead, because the
/// caller has to react to expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptEvent {
    Select(OptionKey),
    ToggleMark,
    Next,
    Previous,
    Jump(usize),
    SetLanguage(Language),
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedResult {
    pub result_id: ResultId,
    pub result: TestResult,
}

/// Orchestrates one timed attempt against the storage collaborators.
///
/// The service owns no attempt state; the session lives with the caller and
/// comes back in for every mutation so the durable slot can be refreshed.
#[derive(Clone)]
pub struct TestAttemptService {
    clock: Clock,
    tests: Arc<dyn TestRepository>,
    sessions: Arc<dyn SessionStore>,
    results: Arc<dyn ResultRepository>,
}

impl TestAttemptService {
    #[must_use]
    pub fn new(
        clock: Clock,
        tests: Arc<dyn TestRepository>,
        sessions: Arc<dyn SessionStore>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            tests,
            sessions,
            results,
        }
    }

    /// Load the test and any saved state for `(user, test)`; resume when the
    /// slot matches, start fresh otherwise.
    ///
    /// Both reads complete before this returns, so the caller only starts
    /// its countdown once the attempt is fully formed.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::TestNotFound` when the test is missing,
    /// `AttemptError::CorruptSavedSession` when a saved state no longer
    /// matches the question list, and `AttemptError::Storage` for load
    /// failures. All of these block entry to the attempt screen.
    pub async fn start_or_resume(
        &self,
        user: UserId,
        test_id: TestId,
    ) -> Result<StartedAttempt, AttemptError> {
        let test = self
            .tests
            .get_test(test_id)
            .await?
            .ok_or(AttemptError::TestNotFound(test_id))?;

        let saved = self.sessions.load_session(user, test_id).await?;
        let (session, resumed) = match saved {
            Some(saved) => (saved.resume(&test)?, true),
            None => (SessionState::start(&test), false),
        };

        if !resumed {
            // Occupy the slot right away so a reload before the first
            // answer still resumes instead of restarting the clock.
            self.save_best_effort(user, &session).await;
        }

        Ok(StartedAttempt {
            test,
            session,
            resumed,
        })
    }

    /// Apply one UI event to the session and refresh the durable slot.
    pub async fn apply(&self, user: UserId, session: &mut SessionState, event: AttemptEvent) {
        match event {
            AttemptEvent::Select(option) => session.select(option),
            AttemptEvent::ToggleMark => session.toggle_mark(),
            AttemptEvent::Next => session.next(),
            AttemptEvent::Previous => session.previous(),
            AttemptEvent::Jump(index) => session.jump(index),
            AttemptEvent::SetLanguage(language) => session.set_language(language),
        }
        self.save_best_effort(user, session).await;
    }

    /// One countdown second; persists the decremented value so a reload
    /// loses at most the second in flight.
    pub async fn tick(&self, user: UserId, session: &mut SessionState) -> TickOutcome {
        let outcome = session.tick();
        self.save_best_effort(user, session).await;
        outcome
    }

    /// The confirmation summary shown before a manual submit.
    #[must_use]
    pub fn submission_summary(&self, session: &SessionState) -> SubmitSummary {
        SubmitSummary::from_session(session)
    }

    /// Grade the attempt, hand the result to the sink, and clear the slot.
    ///
    /// The slot is cleared only after the sink accepted the result; on
    /// failure both the in-memory state and the saved slot survive so the
    /// user can retry the submit.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Storage` when the result sink rejects the
    /// write.
    pub async fn submit(
        &self,
        user: UserId,
        test: &Test,
        session: &SessionState,
    ) -> Result<SubmittedResult, SubmitError> {
        let result = TestResult::grade(test, session, self.clock.now());
        let result_id = self.results.append_result(user, &result).await?;

        // The attempt is recorded; a failure to drop the slot must not fail
        // the submit. The stale slot is replaced on the next attempt.
        if let Err(err) = self.sessions.clear_session(user).await {
            tracing::warn!(user = %user, error = %err, "failed to clear submitted session slot");
        }

        Ok(SubmittedResult { result_id, result })
    }

    /// Which test currently occupies the user's resume slot, if any.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Storage` on storage failure.
    pub async fn active_session(
        &self,
        user: UserId,
    ) -> Result<Option<ActiveSession>, AttemptError> {
        Ok(self.sessions.active_session(user).await?)
    }

    async fn save_best_effort(&self, user: UserId, session: &SessionState) {
        if let Err(err) = self
            .sessions
            .save_session(user, session, self.clock.now())
            .await
        {
            // Non-fatal: the attempt keeps running in memory; a reload may
            // lose the unsaved progress.
            tracing::warn!(user = %user, error = %err, "session save failed");
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
