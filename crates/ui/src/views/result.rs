use dioxus::prelude::*;
use dioxus_router::Link;

use exam_core::model::{Language, OptionKey, Test, TestResult};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ResultHeaderVm, indicator_class, map_result_header, solution_legend_rows, solution_palette};

#[derive(Clone, Debug, PartialEq)]
struct QuestionReview {
    prompt: String,
    chosen: Option<OptionKey>,
    correct: OptionKey,
    correct_text: String,
    explanation: Option<String>,
    dot_class: &'static str,
}

#[derive(Clone, PartialEq)]
struct ResultData {
    header: ResultHeaderVm,
    palette: Vec<&'static str>,
    legend_rows: Vec<(&'static str, u32, &'static str)>,
    reviews: Vec<QuestionReview>,
}

fn map_result_data(test: &Test, result: &TestResult) -> ResultData {
    let language = Language::English;
    let (indicators, legend) = solution_palette(test, result);

    let reviews = test
        .questions()
        .iter()
        .zip(result.answers())
        .zip(&indicators)
        .map(|((question, answer), indicator)| QuestionReview {
            prompt: question.prompt().get(language).to_string(),
            chosen: answer.answer(),
            correct: question.correct(),
            correct_text: question.option(question.correct()).get(language).to_string(),
            explanation: question
                .explanation()
                .map(|text| text.get(language).to_string()),
            dot_class: indicator_class(*indicator),
        })
        .collect();

    ResultData {
        header: map_result_header(test, result, language, result.submitted_at()),
        palette: indicators.iter().map(|i| indicator_class(*i)).collect(),
        legend_rows: solution_legend_rows(&legend),
        reviews,
    }
}

#[component]
pub fn ResultView(result_id: i64) -> Element {
    let ctx = use_context::<AppContext>();
    let results = ctx.results();
    let catalog = ctx.catalog();

    let resource = use_resource(move || {
        let results = results.clone();
        let catalog = catalog.clone();

        async move {
            let row = results
                .get_result(result_id)
                .await
                .map_err(|_| ViewError::NotFound)?;
            let test = catalog
                .get_test(row.result.test_id())
                .await
                .map_err(|_| ViewError::Unknown)?
                .ok_or(ViewError::NotFound)?;

            Ok::<_, ViewError>(map_result_data(&test, &row.result))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page result-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    Link { class: "btn btn-secondary", to: Route::Home {}, "Back to Tests" }
                },
                ViewState::Ready(data) => rsx! {
                    header { class: "result-header",
                        h2 { "{data.header.title}" }
                        p { class: "result-header__score", "Score: {data.header.score_label} ({data.header.percentage_label})" }
                    }

                    dl { class: "summary",
                        dt { "Correct" }
                        dd { "{data.header.correct_label}" }

                        dt { "Incorrect" }
                        dd { "{data.header.incorrect_label}" }

                        dt { "Unattempted" }
                        dd { "{data.header.unattempted_label}" }

                        dt { "Time taken" }
                        dd { "{data.header.time_taken_label}" }

                        dt { "Submitted" }
                        dd { "{data.header.submitted_at_label}" }
                    }

                    div { class: "palette",
                        h3 { class: "palette__title", "Solutions" }
                        div { class: "palette__grid",
                            for (index, class) in data.palette.iter().enumerate() {
                                span { key: "{index}", class: "{class}", "{index + 1}" }
                            }
                        }
                        ul { class: "palette__legend",
                            for (label, count, class) in data.legend_rows.clone() {
                                li { key: "{label}",
                                    span { class: "{class}" }
                                    span { "{label}: {count}" }
                                }
                            }
                        }
                    }

                    ol { class: "review-list",
                        for (index, review) in data.reviews.iter().enumerate() {
                            li { key: "{index}", class: "review-item",
                                p { class: "review-item__prompt", "{review.prompt}" }
                                p { class: "review-item__answers",
                                    match review.chosen {
                                        Some(chosen) => rsx! {
                                            span { "Your answer: {chosen}" }
                                        },
                                        None => rsx! {
                                            span { "Not answered" }
                                        },
                                    }
                                    span { class: "{review.dot_class}" }
                                    span { " Correct answer: {review.correct} — {review.correct_text}" }
                                }
                                if let Some(explanation) = review.explanation.clone() {
                                    p { class: "review-item__explanation", "{explanation}" }
                                }
                            }
                        }
                    }

                    Link { class: "btn btn-primary", to: Route::Home {}, "Back to Tests" }
                },
            }
        }
    }
}
