use exam_core::model::{
    Language, OptionKey, PracticeSession, PracticeStatus, PracticeSummary, Question, Test, TestId,
};
use services::PracticeService;

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeIntent {
    Select(OptionKey),
    Next,
    Previous,
    Jump(usize),
    SetLanguage(Language),
}

/// View-model for an untimed practice run. Nothing here touches storage:
/// the whole run lives and dies with the screen.
pub struct PracticeVm {
    test: Test,
    session: PracticeSession,
    language: Language,
}

impl PracticeVm {
    #[must_use]
    pub fn new(test: Test, session: PracticeSession) -> Self {
        Self {
            test,
            session,
            language: Language::default(),
        }
    }

    #[must_use]
    pub fn test(&self) -> &Test {
        &self.test
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
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

    /// The locked selection on the current question, if any.
    #[must_use]
    pub fn locked_selection(&self) -> Option<OptionKey> {
        self.session.current_answer().selected()
    }

    #[must_use]
    pub fn current_status(&self) -> PracticeStatus {
        self.session.current_answer().status()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    #[must_use]
    pub fn summary(&self) -> PracticeSummary {
        self.session.summary()
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<PracticeStatus> {
        self.session.answers().iter().map(|a| a.status()).collect()
    }

    /// All mutations are synchronous; selections lock on first use.
    pub fn apply(&mut self, intent: PracticeIntent) {
        match intent {
            PracticeIntent::Select(option) => {
                let _ = self.session.select(&self.test, option);
            }
            PracticeIntent::Next => self.session.next(),
            PracticeIntent::Previous => self.session.previous(),
            PracticeIntent::Jump(index) => self.session.jump(index),
            PracticeIntent::SetLanguage(language) => self.language = language,
        }
    }
}

/// CSS class for a practice palette dot.
#[must_use]
pub fn practice_status_class(status: PracticeStatus) -> &'static str {
    match status {
        PracticeStatus::Unattempted => "palette-dot palette-dot--unattempted",
        PracticeStatus::Correct => "palette-dot palette-dot--correct",
        PracticeStatus::Incorrect => "palette-dot palette-dot--incorrect",
    }
}

/// # Errors
///
/// Returns `ViewError::NotFound` when the test does not exist and
/// `ViewError::Unknown` for load failures.
pub async fn start_practice(
    practice: &PracticeService,
    test_id: u64,
) -> Result<PracticeVm, ViewError> {
    let (test, session) = match practice.start(TestId::new(test_id)).await {
        Ok(started) => started,
        Err(services::PracticeError::TestNotFound(_)) => return Err(ViewError::NotFound),
        Err(_) => return Err(ViewError::Unknown),
    };
    Ok(PracticeVm::new(test, session))
}
