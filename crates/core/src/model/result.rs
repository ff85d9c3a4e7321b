use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answer::UserAnswer;
use crate::model::ids::TestId;
use crate::model::session::SessionState;
use crate::model::test::Test;

/// Pre-submit confirmation summary shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitSummary {
    pub total: usize,
    pub attempted: usize,
    pub unattempted: usize,
    pub seconds_remaining: u32,
}

impl SubmitSummary {
    #[must_use]
    pub fn from_session(session: &SessionState) -> Self {
        Self {
            total: session.question_count(),
            attempted: session.attempted_count(),
            unattempted: session.unattempted_count(),
            seconds_remaining: session.seconds_remaining(),
        }
    }
}

/// The terminal artifact of a timed attempt.
///
/// Computed once at submission from the test definition and the final
/// session state; the session state is discarded right after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    test_id: TestId,
    score: f64,
    total_possible: f64,
    correct_count: u32,
    incorrect_count: u32,
    unattempted_count: u32,
    percentage: f64,
    time_taken_seconds: u32,
    answers: Vec<UserAnswer>,
    submitted_at: DateTime<Utc>,
}

impl TestResult {
    /// Grades a finished session against its test.
    ///
    /// Per question: absent answer contributes 0, a correct answer adds
    /// `marks_per_question`, a wrong answer subtracts `negative_marking`.
    /// The percentage is the literal ratio and is NOT clamped: a heavily
    /// penalised attempt produces a negative percentage.
    #[must_use]
    pub fn grade(test: &Test, session: &SessionState, submitted_at: DateTime<Utc>) -> Self {
        let mut score = 0.0;
        let mut correct_count = 0_u32;
        let mut incorrect_count = 0_u32;
        let mut unattempted_count = 0_u32;

        for (question, answer) in test.questions().iter().zip(session.answers()) {
            match answer.answer() {
                None => unattempted_count += 1,
                Some(selected) if selected == question.correct() => {
                    correct_count += 1;
                    score += test.marks_per_question();
                }
                Some(_) => {
                    incorrect_count += 1;
                    score -= test.negative_marking();
                }
            }
        }

        let total_possible = test.total_possible();
        let percentage = score / total_possible * 100.0;
        let time_taken_seconds = test
            .duration_seconds()
            .saturating_sub(session.seconds_remaining());

        Self {
            test_id: test.id(),
            score,
            total_possible,
            correct_count,
            incorrect_count,
            unattempted_count,
            percentage,
            time_taken_seconds,
            answers: session.answers().to_vec(),
            submitted_at,
        }
    }

    /// Rehydrates a result from storage without re-grading.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_persisted(
        test_id: TestId,
        score: f64,
        total_possible: f64,
        correct_count: u32,
        incorrect_count: u32,
        unattempted_count: u32,
        percentage: f64,
        time_taken_seconds: u32,
        answers: Vec<UserAnswer>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            test_id,
            score,
            total_possible,
            correct_count,
            incorrect_count,
            unattempted_count,
            percentage,
            time_taken_seconds,
            answers,
            submitted_at,
        }
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn total_possible(&self) -> f64 {
        self.total_possible
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    #[must_use]
    pub fn unattempted_count(&self) -> u32 {
        self.unattempted_count
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    #[must_use]
    pub fn time_taken_seconds(&self) -> u32 {
        self.time_taken_seconds
    }

    /// Per-question snapshot of the submitted answers.
    #[must_use]
    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
