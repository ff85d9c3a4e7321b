use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::text::{Bilingual, TextError};

//
// ─── OPTION KEY ────────────────────────────────────────────────────────────────
//

/// The four answer slots of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    /// All keys in display order.
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    /// Position of this key within an option list.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            OptionKey::A => 0,
            OptionKey::B => 1,
            OptionKey::C => 2,
            OptionKey::D => 3,
        }
    }

    /// Converts a list position back to a key.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidOptionKey` if `index` is not 0..=3.
    pub fn from_index(index: usize) -> Result<Self, QuestionError> {
        match index {
            0 => Ok(OptionKey::A),
            1 => Ok(OptionKey::B),
            2 => Ok(OptionKey::C),
            3 => Ok(OptionKey::D),
            _ => Err(QuestionError::InvalidOptionKey(index.to_string())),
        }
    }

    /// Parses the single-letter storage representation.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidOptionKey` for anything but `A`-`D`.
    pub fn parse(value: &str) -> Result<Self, QuestionError> {
        match value {
            "A" => Ok(OptionKey::A),
            "B" => Ok(OptionKey::B),
            "C" => Ok(OptionKey::C),
            "D" => Ok(OptionKey::D),
            other => Err(QuestionError::InvalidOptionKey(other.to_string())),
        }
    }

    /// Single-letter representation. Must stay consistent with `parse`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }
}

impl std::fmt::Display for OptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("invalid option key: {0}")]
    InvalidOptionKey(String),

    #[error("invalid prompt: {0}")]
    InvalidPrompt(#[source] TextError),

    #[error("invalid option {key}: {source}")]
    InvalidOption {
        key: OptionKey,
        #[source]
        source: TextError,
    },
}

/// One assessment item: a bilingual prompt, four bilingual options, the
/// correct key, and optional explanation/section metadata.
///
/// Immutable once the owning test is published; the session engine only
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: Bilingual,
    options: [Bilingual; 4],
    correct: OptionKey,
    explanation: Option<Bilingual>,
    section: Option<String>,
}

impl Question {
    /// Builds a question, validating the prompt and each option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidPrompt` or
    /// `QuestionError::InvalidOption` when any text is blank.
    pub fn new(
        id: QuestionId,
        prompt: Bilingual,
        options: [Bilingual; 4],
        correct: OptionKey,
        explanation: Option<Bilingual>,
        section: Option<String>,
    ) -> Result<Self, QuestionError> {
        if prompt.english().trim().is_empty() {
            return Err(QuestionError::InvalidPrompt(TextError::Empty));
        }
        for (i, option) in options.iter().enumerate() {
            if option.english().trim().is_empty() {
                let key = OptionKey::from_index(i)?;
                return Err(QuestionError::InvalidOption {
                    key,
                    source: TextError::Empty,
                });
            }
        }
        Ok(Self {
            id,
            prompt,
            options,
            correct,
            explanation,
            section,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &Bilingual {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[Bilingual; 4] {
        &self.options
    }

    /// The option text behind a key.
    #[must_use]
    pub fn option(&self, key: OptionKey) -> &Bilingual {
        &self.options[key.index()]
    }

    #[must_use]
    pub fn correct(&self) -> OptionKey {
        self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&Bilingual> {
        self.explanation.as_ref()
    }

    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Whether `answer` matches the key. Absent answers are never correct.
    #[must_use]
    pub fn is_correct(&self, answer: Option<OptionKey>) -> bool {
        answer == Some(self.correct)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
