use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::TestId;
use crate::model::question::{Question, QuestionError};
use crate::model::text::Bilingual;

//
// ─── LIFECYCLE STATUS ──────────────────────────────────────────────────────────
//

/// Publication lifecycle of a test. Draft tests never reach students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Draft,
    Published,
}

impl TestStatus {
    /// Parses the storage representation (`draft` / `published`).
    ///
    /// # Errors
    ///
    /// Returns `TestError::InvalidStatus` for anything else.
    pub fn parse(value: &str) -> Result<Self, TestError> {
        match value {
            "draft" => Ok(TestStatus::Draft),
            "published" => Ok(TestStatus::Published),
            other => Err(TestError::InvalidStatus(other.to_string())),
        }
    }

    /// Storage representation. Must stay consistent with `parse`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Draft => "draft",
            TestStatus::Published => "published",
        }
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TestError {
    #[error("a test needs at least one question")]
    NoQuestions,

    #[error("duration must be at least one minute, got {0}")]
    InvalidDuration(u32),

    #[error("marks per question must be positive, got {0}")]
    InvalidMarks(f64),

    #[error("negative marking must not be negative, got {0}")]
    InvalidNegativeMarking(f64),

    #[error("expiry {expires_at} is not after publish time {published_at}")]
    ExpiryBeforePublish {
        published_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },

    #[error("invalid test status: {0}")]
    InvalidStatus(String),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

//
// ─── TEST ──────────────────────────────────────────────────────────────────────
//

/// An ordered sequence of questions plus attempt parameters.
///
/// Read-only from the session engine's perspective: it is fetched once at
/// session start and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    id: TestId,
    title: Bilingual,
    questions: Vec<Question>,
    duration_minutes: u32,
    marks_per_question: f64,
    negative_marking: f64,
    status: TestStatus,
    published_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Test {
    /// Builds a test, validating attempt parameters and the question list.
    ///
    /// # Errors
    ///
    /// Returns `TestError` when the question list is empty, the duration is
    /// zero, marks are non-positive, the penalty is negative, or the expiry
    /// precedes the publish time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TestId,
        title: Bilingual,
        questions: Vec<Question>,
        duration_minutes: u32,
        marks_per_question: f64,
        negative_marking: f64,
        status: TestStatus,
        published_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TestError> {
        if questions.is_empty() {
            return Err(TestError::NoQuestions);
        }
        if duration_minutes == 0 {
            return Err(TestError::InvalidDuration(duration_minutes));
        }
        if marks_per_question <= 0.0 || marks_per_question.is_nan() {
            return Err(TestError::InvalidMarks(marks_per_question));
        }
        if negative_marking < 0.0 {
            return Err(TestError::InvalidNegativeMarking(negative_marking));
        }
        if let (Some(published_at), Some(expires_at)) = (published_at, expires_at) {
            if expires_at <= published_at {
                return Err(TestError::ExpiryBeforePublish {
                    published_at,
                    expires_at,
                });
            }
        }

        Ok(Self {
            id,
            title,
            questions,
            duration_minutes,
            marks_per_question,
            negative_marking,
            status,
            published_at,
            expires_at,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> TestId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &Bilingual {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Total attempt time in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes * 60
    }

    #[must_use]
    pub fn marks_per_question(&self) -> f64 {
        self.marks_per_question
    }

    #[must_use]
    pub fn negative_marking(&self) -> f64 {
        self.negative_marking
    }

    #[must_use]
    pub fn status(&self) -> TestStatus {
        self.status
    }

    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The maximum achievable score.
    #[must_use]
    pub fn total_possible(&self) -> f64 {
        self.marks_per_question * self.questions.len() as f64
    }

    /// Whether students may attempt the test at `now`: published, past the
    /// publish time (when set) and before the expiry (when set).
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        if self.status != TestStatus::Published {
            return false;
        }
        if let Some(published_at) = self.published_at {
            if now < published_at {
                return false;
            }
        }
        if let Some(expires_at) = self.expires_at {
            if now >= expires_at {
                return false;
            }
        }
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionId;
    use crate::model::question::OptionKey;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            Bilingual::english_only(format!("Question {id}")).unwrap(),
            [
                Bilingual::english_only("one").unwrap(),
                Bilingual::english_only("two").unwrap(),
                Bilingual::english_only("three").unwrap(),
                Bilingual::english_only("four").unwrap(),
            ],
            OptionKey::A,
            None,
            None,
        )
        .unwrap()
    }

    fn build_test(status: TestStatus) -> Test {
        Test::new(
            TestId::new(1),
            Bilingual::english_only("Mock Test 1").unwrap(),
            vec![build_question(1), build_question(2)],
            30,
            2.0,
            0.5,
            status,
            Some(fixed_now()),
            Some(fixed_now() + Duration::days(7)),
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_question_list() {
        let err = Test::new(
            TestId::new(1),
            Bilingual::english_only("Empty").unwrap(),
            Vec::new(),
            30,
            1.0,
            0.0,
            TestStatus::Draft,
            None,
            None,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, TestError::NoQuestions);
    }

    #[test]
    fn rejects_zero_duration_and_bad_marks() {
        let questions = vec![build_question(1)];
        let err = Test::new(
            TestId::new(1),
            Bilingual::english_only("T").unwrap(),
            questions.clone(),
            0,
            1.0,
            0.0,
            TestStatus::Draft,
            None,
            None,
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, TestError::InvalidDuration(0)));

        let err = Test::new(
            TestId::new(1),
            Bilingual::english_only("T").unwrap(),
            questions.clone(),
            10,
            0.0,
            0.0,
            TestStatus::Draft,
            None,
            None,
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, TestError::InvalidMarks(_)));

        let err = Test::new(
            TestId::new(1),
            Bilingual::english_only("T").unwrap(),
            questions,
            10,
            1.0,
            -0.25,
            TestStatus::Draft,
            None,
            None,
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, TestError::InvalidNegativeMarking(_)));
    }

    #[test]
    fn open_window_respects_status_and_expiry() {
        let test = build_test(TestStatus::Published);
        assert!(test.is_open(fixed_now()));
        assert!(test.is_open(fixed_now() + Duration::days(6)));
        assert!(!test.is_open(fixed_now() + Duration::days(7)));
        assert!(!test.is_open(fixed_now() - Duration::minutes(1)));

        let draft = build_test(TestStatus::Draft);
        assert!(!draft.is_open(fixed_now()));
    }

    #[test]
    fn total_possible_uses_marks_and_count() {
        let test = build_test(TestStatus::Published);
        assert!((test.total_possible() - 4.0).abs() < f64::EPSILON);
        assert_eq!(test.duration_seconds(), 1800);
    }

    #[test]
    fn status_str_roundtrip() {
        for status in [TestStatus::Draft, TestStatus::Published] {
            assert_eq!(TestStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(TestStatus::parse("archived").is_err());
    }
}
