use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::OptionKey;

//
// ─── QUESTION STATUS ───────────────────────────────────────────────────────────
//

/// Per-question status shown in the palette.
///
/// The first four values are the live-attempt states; `Incorrect` only
/// appears when a finished attempt is re-rendered against the answer key
/// (solution view), never during a live attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Unattempted,
    Answered,
    Marked,
    AnsweredMarked,
    Incorrect,
}

impl QuestionStatus {
    /// Parses the storage representation.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::InvalidStatus` for unknown values.
    pub fn parse(value: &str) -> Result<Self, AnswerError> {
        match value {
            "unattempted" => Ok(QuestionStatus::Unattempted),
            "answered" => Ok(QuestionStatus::Answered),
            "marked" => Ok(QuestionStatus::Marked),
            "answered_marked" => Ok(QuestionStatus::AnsweredMarked),
            "incorrect" => Ok(QuestionStatus::Incorrect),
            other => Err(AnswerError::InvalidStatus(other.to_string())),
        }
    }

    /// Storage representation. Must stay consistent with `parse`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStatus::Unattempted => "unattempted",
            QuestionStatus::Answered => "answered",
            QuestionStatus::Marked => "marked",
            QuestionStatus::AnsweredMarked => "answered_marked",
            QuestionStatus::Incorrect => "incorrect",
        }
    }

    /// Whether the status carries the mark-for-review flag.
    #[must_use]
    pub fn is_marked(self) -> bool {
        matches!(self, QuestionStatus::Marked | QuestionStatus::AnsweredMarked)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("invalid question status: {0}")]
    InvalidStatus(String),
}

//
// ─── USER ANSWER ───────────────────────────────────────────────────────────────
//

/// One question's answer/mark state within an attempt.
///
/// Selecting the currently-selected option clears the answer (toggle-off);
/// selecting a different option overwrites it; the mark flag is orthogonal
/// to answer presence. The pair of `select` and `toggle_mark` below is the
/// exhaustive set of valid transitions.
///
/// Deserialization goes through [`UserAnswer::from_persisted`], so a cached
/// attempt can never rehydrate a status that disagrees with its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUserAnswer", into = "RawUserAnswer")]
pub struct UserAnswer {
    answer: Option<OptionKey>,
    status: QuestionStatus,
}

/// Wire shape of [`UserAnswer`] before validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawUserAnswer {
    answer: Option<OptionKey>,
    status: QuestionStatus,
}

impl TryFrom<RawUserAnswer> for UserAnswer {
    type Error = AnswerError;

    fn try_from(raw: RawUserAnswer) -> Result<Self, Self::Error> {
        UserAnswer::from_persisted(raw.answer, raw.status)
    }
}

impl From<UserAnswer> for RawUserAnswer {
    fn from(answer: UserAnswer) -> Self {
        Self {
            answer: answer.answer,
            status: answer.status,
        }
    }
}

impl Default for UserAnswer {
    fn default() -> Self {
        Self {
            answer: None,
            status: QuestionStatus::Unattempted,
        }
    }
}

impl UserAnswer {
    #[must_use]
    pub fn answer(&self) -> Option<OptionKey> {
        self.answer
    }

    #[must_use]
    pub fn status(&self) -> QuestionStatus {
        self.status
    }

    #[must_use]
    pub fn is_attempted(&self) -> bool {
        self.answer.is_some()
    }

    /// Applies an option selection.
    ///
    /// Re-selecting the current option clears the answer and drops back to
    /// the mark-only state; any other option becomes the new answer while
    /// the mark flag is preserved.
    pub fn select(&mut self, option: OptionKey) {
        if self.answer == Some(option) {
            self.answer = None;
            self.status = if self.status.is_marked() {
                QuestionStatus::Marked
            } else {
                QuestionStatus::Unattempted
            };
        } else {
            self.answer = Some(option);
            self.status = if self.status.is_marked() {
                QuestionStatus::AnsweredMarked
            } else {
                QuestionStatus::Answered
            };
        }
    }

    /// Flips the mark-for-review flag, keeping the answer untouched.
    pub fn toggle_mark(&mut self) {
        self.status = match (self.answer.is_some(), self.status.is_marked()) {
            (false, false) => QuestionStatus::Marked,
            (true, false) => QuestionStatus::AnsweredMarked,
            (false, true) => QuestionStatus::Unattempted,
            (true, true) => QuestionStatus::Answered,
        };
    }

    /// Rehydrates an answer from the durable cache, rejecting pairs that the
    /// live transition table cannot produce.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::InvalidStatus` when the status does not match
    /// the stored answer presence (including `Incorrect`, which is a
    /// render-time status and is never persisted for a live attempt).
    pub fn from_persisted(
        answer: Option<OptionKey>,
        status: QuestionStatus,
    ) -> Result<Self, AnswerError> {
        let valid = match status {
            QuestionStatus::Unattempted | QuestionStatus::Marked => answer.is_none(),
            QuestionStatus::Answered | QuestionStatus::AnsweredMarked => answer.is_some(),
            QuestionStatus::Incorrect => false,
        };
        if !valid {
            return Err(AnswerError::InvalidStatus(status.as_str().to_string()));
        }
        Ok(Self { answer, status })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
