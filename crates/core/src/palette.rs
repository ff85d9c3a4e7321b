//! Question palette read-model: one indicator per question plus a legend
//! tally, derived from the session state (live) or from a submitted answer
//! snapshot against the key (solution view).

use crate::model::answer::{QuestionStatus, UserAnswer};
use crate::model::test::Test;

/// How the palette colours its indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteMode {
    /// Live attempt: answered / marked / answered-marked / unattempted.
    Test,
    /// Retrospective view: statuses re-derived from correctness.
    Solution,
}

/// The indicator shown for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Unattempted,
    Answered,
    Marked,
    AnsweredMarked,
    Correct,
    Incorrect,
}

impl Indicator {
    fn from_live(status: QuestionStatus) -> Self {
        match status {
            QuestionStatus::Unattempted => Indicator::Unattempted,
            QuestionStatus::Answered => Indicator::Answered,
            QuestionStatus::Marked => Indicator::Marked,
            QuestionStatus::AnsweredMarked => Indicator::AnsweredMarked,
            // Persisted live attempts never hold this status; render it
            // as-is rather than invent a mapping.
            QuestionStatus::Incorrect => Indicator::Incorrect,
        }
    }
}

/// Status counts for the palette legend.
///
/// Counts always sum to the number of questions they were tallied over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Legend {
    pub unattempted: u32,
    pub answered: u32,
    pub marked: u32,
    pub answered_marked: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl Legend {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.unattempted
            + self.answered
            + self.marked
            + self.answered_marked
            + self.correct
            + self.incorrect
    }
}

/// Indicators for a live attempt, in question order.
#[must_use]
pub fn live_indicators(answers: &[UserAnswer]) -> Vec<Indicator> {
    answers
        .iter()
        .map(|a| Indicator::from_live(a.status()))
        .collect()
}

/// Indicators for the solution view: each answered question resolves to
/// correct/incorrect against the key, unanswered stays unattempted.
#[must_use]
pub fn solution_indicators(test: &Test, answers: &[UserAnswer]) -> Vec<Indicator> {
    test.questions()
        .iter()
        .zip(answers)
        .map(|(question, answer)| match answer.answer() {
            None => Indicator::Unattempted,
            Some(selected) if selected == question.correct() => Indicator::Correct,
            Some(_) => Indicator::Incorrect,
        })
        .collect()
}

/// Indicators for either display mode.
#[must_use]
pub fn indicators(mode: PaletteMode, test: &Test, answers: &[UserAnswer]) -> Vec<Indicator> {
    match mode {
        PaletteMode::Test => live_indicators(answers),
        PaletteMode::Solution => solution_indicators(test, answers),
    }
}

/// Tallies indicators into the legend.
#[must_use]
pub fn legend(indicators: &[Indicator]) -> Legend {
    let mut legend = Legend::default();
    for indicator in indicators {
        match indicator {
            Indicator::Unattempted => legend.unattempted += 1,
            Indicator::Answered => legend.answered += 1,
            Indicator::Marked => legend.marked += 1,
            Indicator::AnsweredMarked => legend.answered_marked += 1,
            Indicator::Correct => legend.correct += 1,
            Indicator::Incorrect => legend.incorrect += 1,
        }
    }
    legend
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::{QuestionId, TestId};
    use crate::model::question::{OptionKey, Question};
    use crate::model::session::SessionState;
    use crate::model::test::TestStatus;
    use crate::model::text::Bilingual;
    use crate::time::fixed_now;

    fn build_test(count: u64) -> Test {
        let questions = (1..=count)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    Bilingual::english_only(format!("Q{id}")).unwrap(),
                    [
                        Bilingual::english_only("a").unwrap(),
                        Bilingual::english_only("b").unwrap(),
                        Bilingual::english_only("c").unwrap(),
                        Bilingual::english_only("d").unwrap(),
                    ],
                    OptionKey::A,
                    None,
                    None,
                )
                .unwrap()
            })
            .collect();
        Test::new(
            TestId::new(1),
            Bilingual::english_only("Palette").unwrap(),
            questions,
            10,
            1.0,
            0.0,
            TestStatus::Published,
            None,
            None,
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn live_legend_tally_equals_question_count() {
        let test = build_test(4);
        let mut session = SessionState::start(&test);
        session.select(OptionKey::A);
        session.next();
        session.toggle_mark();
        session.next();
        session.select(OptionKey::B);
        session.toggle_mark();

        let indicators = live_indicators(session.answers());
        assert_eq!(
            indicators,
            vec![
                Indicator::Answered,
                Indicator::Marked,
                Indicator::AnsweredMarked,
                Indicator::Unattempted,
            ]
        );

        let legend = legend(&indicators);
        assert_eq!(legend.total() as usize, session.question_count());
        assert_eq!(legend.answered, 1);
        assert_eq!(legend.marked, 1);
        assert_eq!(legend.answered_marked, 1);
        assert_eq!(legend.unattempted, 1);
    }

    #[test]
    fn tally_holds_after_every_mutation() {
        let test = build_test(3);
        let mut session = SessionState::start(&test);

        let check = |session: &SessionState| {
            let l = legend(&live_indicators(session.answers()));
            assert_eq!(l.total() as usize, session.question_count());
        };

        check(&session);
        session.select(OptionKey::C);
        check(&session);
        session.select(OptionKey::C);
        check(&session);
        session.toggle_mark();
        check(&session);
        session.next();
        session.select(OptionKey::D);
        session.toggle_mark();
        check(&session);
    }

    #[test]
    fn solution_mode_rederives_from_correctness() {
        let test = build_test(3);
        let mut session = SessionState::start(&test);
        session.select(OptionKey::A); // correct
        session.next();
        session.select(OptionKey::C); // incorrect
        // third question unanswered, but marked: the mark is irrelevant in
        // solution mode.
        session.next();
        session.toggle_mark();

        let indicators = solution_indicators(&test, session.answers());
        assert_eq!(
            indicators,
            vec![
                Indicator::Correct,
                Indicator::Incorrect,
                Indicator::Unattempted,
            ]
        );

        let legend = legend(&indicators);
        assert_eq!(legend.correct, 1);
        assert_eq!(legend.incorrect, 1);
        assert_eq!(legend.unattempted, 1);
        assert_eq!(legend.total(), 3);
    }
}
