use chrono::{DateTime, Utc};

use exam_core::model::{Language, Test, TestResult};
use exam_core::palette::{Indicator, Legend, legend, solution_indicators};

use crate::vm::time_fmt::format_clock;

/// Formatted fields for the result screen header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultHeaderVm {
    pub title: String,
    pub score_label: String,
    pub percentage_label: String,
    pub correct_label: String,
    pub incorrect_label: String,
    pub unattempted_label: String,
    pub time_taken_label: String,
    pub submitted_at_label: String,
}

#[must_use]
pub fn map_result_header(
    test: &Test,
    result: &TestResult,
    language: Language,
    submitted_at: DateTime<Utc>,
) -> ResultHeaderVm {
    ResultHeaderVm {
        title: test.title().get(language).to_string(),
        score_label: format!("{} / {}", trim_number(result.score()), trim_number(result.total_possible())),
        percentage_label: format!("{:.2}%", result.percentage()),
        correct_label: result.correct_count().to_string(),
        incorrect_label: result.incorrect_count().to_string(),
        unattempted_label: result.unattempted_count().to_string(),
        time_taken_label: format_clock(result.time_taken_seconds()),
        submitted_at_label: submitted_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

/// Indicators and legend for the solution palette of a finished attempt.
#[must_use]
pub fn solution_palette(test: &Test, result: &TestResult) -> (Vec<Indicator>, Legend) {
    let indicators = solution_indicators(test, result.answers());
    let tally = legend(&indicators);
    (indicators, tally)
}

/// Renders a score-like float without a trailing `.0` but keeping real
/// fractions (negative marking produces halves and quarters).
fn trim_number(value: f64) -> String {
    if (value - value.trunc()).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
