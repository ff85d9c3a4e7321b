use exam_core::palette::{Indicator, Legend};

/// CSS modifier class for one palette indicator.
#[must_use]
pub fn indicator_class(indicator: Indicator) -> &'static str {
    match indicator {
        Indicator::Unattempted => "palette-dot palette-dot--unattempted",
        Indicator::Answered => "palette-dot palette-dot--answered",
        Indicator::Marked => "palette-dot palette-dot--marked",
        Indicator::AnsweredMarked => "palette-dot palette-dot--answered-marked",
        Indicator::Correct => "palette-dot palette-dot--correct",
        Indicator::Incorrect => "palette-dot palette-dot--incorrect",
    }
}

/// Legend rows for the live palette, label + count + the dot class.
#[must_use]
pub fn live_legend_rows(legend: &Legend) -> Vec<(&'static str, u32, &'static str)> {
    vec![
        (
            "Answered",
            legend.answered,
            indicator_class(Indicator::Answered),
        ),
        ("Marked", legend.marked, indicator_class(Indicator::Marked)),
        (
            "Answered & Marked",
            legend.answered_marked,
            indicator_class(Indicator::AnsweredMarked),
        ),
        (
            "Unattempted",
            legend.unattempted,
            indicator_class(Indicator::Unattempted),
        ),
    ]
}

/// Legend rows for the solution palette.
#[must_use]
pub fn solution_legend_rows(legend: &Legend) -> Vec<(&'static str, u32, &'static str)> {
    vec![
        (
            "Correct",
            legend.correct,
            indicator_class(Indicator::Correct),
        ),
        (
            "Incorrect",
            legend.incorrect,
            indicator_class(Indicator::Incorrect),
        ),
        (
            "Unattempted",
            legend.unattempted,
            indicator_class(Indicator::Unattempted),
        ),
    ]
}
