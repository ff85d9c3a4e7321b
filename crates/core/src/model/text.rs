use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display language for test content. Every prompt, option and explanation
/// carries both renderings; the session picks one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Hindi,
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl Language {
    /// Parses the storage/wire representation (`english` / `hindi`).
    ///
    /// # Errors
    ///
    /// Returns `TextError::InvalidLanguage` for anything else.
    pub fn parse(value: &str) -> Result<Self, TextError> {
        match value {
            "english" => Ok(Language::English),
            "hindi" => Ok(Language::Hindi),
            other => Err(TextError::InvalidLanguage(other.to_string())),
        }
    }

    /// Storage/wire representation. Must stay consistent with `parse`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("text must not be empty")]
    Empty,

    #[error("invalid language: {0}")]
    InvalidLanguage(String),
}

/// A piece of content in both supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual {
    english: String,
    hindi: String,
}

impl Bilingual {
    /// Builds bilingual text, requiring a non-blank English rendering.
    ///
    /// The Hindi rendering may be blank; `get` falls back to English so a
    /// partially translated test still displays.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the English text is blank.
    pub fn new(english: impl Into<String>, hindi: impl Into<String>) -> Result<Self, TextError> {
        let english = english.into();
        if english.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self {
            english,
            hindi: hindi.into(),
        })
    }

    /// English-only content; Hindi falls back to the English text.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the text is blank.
    pub fn english_only(text: impl Into<String>) -> Result<Self, TextError> {
        Self::new(text, "")
    }

    /// Returns the rendering for `language`, falling back to English when
    /// the Hindi text is blank.
    #[must_use]
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Hindi => {
                if self.hindi.trim().is_empty() {
                    &self.english
                } else {
                    &self.hindi
                }
            }
        }
    }

    #[must_use]
    pub fn english(&self) -> &str {
        &self.english
    }

    #[must_use]
    pub fn hindi(&self) -> &str {
        &self.hindi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_english() {
        let err = Bilingual::new("   ", "ठीक").unwrap_err();
        assert_eq!(err, TextError::Empty);
    }

    #[test]
    fn hindi_falls_back_to_english_when_blank() {
        let text = Bilingual::english_only("velocity").unwrap();
        assert_eq!(text.get(Language::Hindi), "velocity");

        let translated = Bilingual::new("velocity", "वेग").unwrap();
        assert_eq!(translated.get(Language::Hindi), "वेग");
        assert_eq!(translated.get(Language::English), "velocity");
    }

    #[test]
    fn language_str_roundtrip() {
        for lang in [Language::English, Language::Hindi] {
            assert_eq!(Language::parse(lang.as_str()).unwrap(), lang);
        }
        assert!(Language::parse("klingon").is_err());
    }
}
