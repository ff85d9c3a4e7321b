use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::UserAnswer;
use crate::model::ids::TestId;
use crate::model::question::OptionKey;
use crate::model::test::Test;
use crate::model::text::Language;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("answer count {answers} does not match question count {questions}")]
    AnswerCountMismatch { answers: usize, questions: usize },

    #[error("current index {index} is out of range for {questions} questions")]
    IndexOutOfRange { index: usize, questions: usize },

    #[error("session belongs to test {actual}, expected {expected}")]
    TestMismatch { expected: TestId, actual: TestId },
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down.
    Running,
    /// This tick hit zero; the caller must auto-submit exactly once.
    Expired,
}

/// The mutable aggregate for one live attempt.
///
/// Every mutation is synchronous and produces a state the durable cache can
/// serialize as-is; the timer is relative seconds-remaining, not a
/// wall-clock deadline, so a reload resumes from the last persisted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    test_id: TestId,
    current_index: usize,
    answers: Vec<UserAnswer>,
    seconds_remaining: u32,
    language: Language,
}

impl SessionState {
    /// Fresh state for a new attempt on `test`.
    #[must_use]
    pub fn start(test: &Test) -> Self {
        Self {
            test_id: test.id(),
            current_index: 0,
            answers: vec![UserAnswer::default(); test.question_count()],
            seconds_remaining: test.duration_seconds(),
            language: Language::default(),
        }
    }

    /// Rehydrates a persisted state against the test it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the state was saved for a different test
    /// or its shape no longer matches the question list.
    pub fn resume(self, test: &Test) -> Result<Self, SessionError> {
        if self.test_id != test.id() {
            return Err(SessionError::TestMismatch {
                expected: test.id(),
                actual: self.test_id,
            });
        }
        if self.answers.len() != test.question_count() {
            return Err(SessionError::AnswerCountMismatch {
                answers: self.answers.len(),
                questions: test.question_count(),
            });
        }
        if self.current_index >= test.question_count() {
            return Err(SessionError::IndexOutOfRange {
                index: self.current_index,
                questions: test.question_count(),
            });
        }
        Ok(self)
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&UserAnswer> {
        self.answers.get(index)
    }

    #[must_use]
    pub fn current_answer(&self) -> &UserAnswer {
        &self.answers[self.current_index]
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Number of questions with an answer selected.
    #[must_use]
    pub fn attempted_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_attempted()).count()
    }

    #[must_use]
    pub fn unattempted_count(&self) -> usize {
        self.question_count() - self.attempted_count()
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────
    //

    /// Moves to the next question; a no-op at the last index.
    pub fn next(&mut self) {
        if self.current_index + 1 < self.answers.len() {
            self.current_index += 1;
        }
    }

    /// Moves to the previous question; a no-op at index 0.
    pub fn previous(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    /// Jumps straight to `index` (palette selection); out-of-range requests
    /// are no-ops.
    pub fn jump(&mut self, index: usize) {
        if index < self.answers.len() {
            self.current_index = index;
        }
    }

    //
    // ─── ANSWER / MARK ─────────────────────────────────────────────────────
    //

    /// Applies an option selection to the current question.
    pub fn select(&mut self, option: OptionKey) {
        self.answers[self.current_index].select(option);
    }

    /// Toggles mark-for-review on the current question.
    pub fn toggle_mark(&mut self) {
        self.answers[self.current_index].toggle_mark();
    }

    //
    // ─── TIMER ─────────────────────────────────────────────────────────────
    //

    /// One countdown second. Saturates at zero and reports `Expired` once
    /// the countdown is spent; the caller stops the timer on the first
    /// expiry so auto-submission fires exactly once.
    pub fn tick(&mut self) -> TickOutcome {
        if self.seconds_remaining == 0 {
            return TickOutcome::Expired;
        }
        self.seconds_remaining -= 1;
        if self.seconds_remaining == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Running
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.seconds_remaining == 0
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
