use serde::{Deserialize, Serialize};

use crate::model::ids::TestId;
use crate::model::question::OptionKey;
use crate::model::test::Test;

/// Status of one question in a practice attempt. No "marked" concept here:
/// a selection locks the question and its correctness is known immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeStatus {
    Unattempted,
    Correct,
    Incorrect,
}

/// One question's locked selection, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeAnswer {
    selected: Option<OptionKey>,
    correct: bool,
}

impl PracticeAnswer {
    #[must_use]
    pub fn selected(&self) -> Option<OptionKey> {
        self.selected
    }

    #[must_use]
    pub fn status(&self) -> PracticeStatus {
        match self.selected {
            None => PracticeStatus::Unattempted,
            Some(_) if self.correct => PracticeStatus::Correct,
            Some(_) => PracticeStatus::Incorrect,
        }
    }
}

/// Untimed attempt with immediate feedback; answers lock on first selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSession {
    test_id: TestId,
    current_index: usize,
    answers: Vec<PracticeAnswer>,
}

impl PracticeSession {
    #[must_use]
    pub fn start(test: &Test) -> Self {
        Self {
            test_id: test.id(),
            current_index: 0,
            answers: vec![PracticeAnswer::default(); test.question_count()],
        }
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
    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn answers(&self) -> &[PracticeAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&PracticeAnswer> {
        self.answers.get(index)
    }

    #[must_use]
    pub fn current_answer(&self) -> &PracticeAnswer {
        &self.answers[self.current_index]
    }

    /// Whether the current question is locked (already answered).
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.current_answer().selected.is_some()
    }

    pub fn next(&mut self) {
        if self.current_index + 1 < self.answers.len() {
            self.current_index += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    pub fn jump(&mut self, index: usize) {
        if index < self.answers.len() {
            self.current_index = index;
        }
    }

    /// Locks in a selection for the current question and reveals its
    /// correctness. A second selection on the same question is a no-op.
    ///
    /// Returns the resulting status, or `None` when the selection was
    /// ignored because the question is already locked.
    pub fn select(&mut self, test: &Test, option: OptionKey) -> Option<PracticeStatus> {
        let answer = &mut self.answers[self.current_index];
        if answer.selected.is_some() {
            return None;
        }
        let correct = test
            .question(self.current_index)
            .is_some_and(|q| q.is_correct(Some(option)));
        answer.selected = Some(option);
        answer.correct = correct;
        Some(answer.status())
    }

    /// Whether every question has been answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(|a| a.selected.is_some())
    }

    #[must_use]
    pub fn summary(&self) -> PracticeSummary {
        let mut correct = 0_u32;
        let mut incorrect = 0_u32;
        let mut unattempted = 0_u32;
        for answer in &self.answers {
            match answer.status() {
                PracticeStatus::Correct => correct += 1,
                PracticeStatus::Incorrect => incorrect += 1,
                PracticeStatus::Unattempted => unattempted += 1,
            }
        }
        PracticeSummary {
            total: self.answers.len() as u32,
            correct,
            incorrect,
            unattempted,
        }
    }
}

/// Counts of each practice outcome plus proportional fractions for charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeSummary {
    pub total: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub unattempted: u32,
}

impl PracticeSummary {
    /// Fraction of questions answered correctly, in `[0, 1]`.
    #[must_use]
    pub fn correct_fraction(&self) -> f64 {
        self.fraction(self.correct)
    }

    #[must_use]
    pub fn incorrect_fraction(&self) -> f64 {
        self.fraction(self.incorrect)
    }

    #[must_use]
    pub fn unattempted_fraction(&self) -> f64 {
        self.fraction(self.unattempted)
    }

    fn fraction(&self, count: u32) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(count) / f64::from(self.total)
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
