use dioxus::prelude::*;
use dioxus_router::Link;

use exam_core::model::Language;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::format_clock;

#[derive(Clone, Debug, PartialEq)]
struct TestCard {
    test_id: u64,
    title: String,
    question_label: String,
    duration_label: String,
    marking_label: String,
}

#[derive(Clone, Debug, PartialEq)]
struct ResumeBanner {
    test_id: u64,
    title: String,
}

#[derive(Clone, Debug, PartialEq)]
struct RecentResult {
    result_id: i64,
    title: String,
    score_label: String,
}

#[derive(Clone, Debug, PartialEq)]
struct HomeData {
    resume: Option<ResumeBanner>,
    tests: Vec<TestCard>,
    recent: Vec<RecentResult>,
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let user_id = ctx.user_id();
    let catalog = ctx.catalog();
    let attempts = ctx.attempts();
    let results = ctx.results();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let attempts = attempts.clone();
        let results = results.clone();

        async move {
            let open = catalog
                .list_open(50)
                .await
                .map_err(|_| ViewError::Unknown)?;

            let resume = match attempts
                .active_session(user_id)
                .await
                .map_err(|_| ViewError::Unknown)?
            {
                Some(active) => {
                    // The occupying test may have been unpublished since;
                    // drop the banner rather than dead-link it.
                    catalog
                        .get_test(active.test_id)
                        .await
                        .map_err(|_| ViewError::Unknown)?
                        .map(|test| ResumeBanner {
                            test_id: test.id().value(),
                            title: test.title().get(Language::English).to_string(),
                        })
                }
                None => None,
            };

            let mut recent = Vec::new();
            for row in results
                .list_results(user_id, 5)
                .await
                .map_err(|_| ViewError::Unknown)?
            {
                let title = catalog
                    .get_test(row.result.test_id())
                    .await
                    .map_err(|_| ViewError::Unknown)?
                    .map_or_else(
                        || format!("Test {}", row.result.test_id()),
                        |t| t.title().get(Language::English).to_string(),
                    );
                recent.push(RecentResult {
                    result_id: row.id,
                    title,
                    score_label: format!("{:.2}%", row.result.percentage()),
                });
            }

            let tests = open
                .iter()
                .map(|test| {
                    let marking_label = if test.negative_marking() > 0.0 {
                        format!(
                            "+{} / -{} per question",
                            test.marks_per_question(),
                            test.negative_marking()
                        )
                    } else {
                        format!("+{} per question", test.marks_per_question())
                    };
                    TestCard {
                        test_id: test.id().value(),
                        title: test.title().get(Language::English).to_string(),
                        question_label: format!("{} questions", test.question_count()),
                        duration_label: format_clock(test.duration_seconds()),
                        marking_label,
                    }
                })
                .collect();

            Ok::<_, ViewError>(HomeData {
                resume,
                tests,
                recent,
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page home-page",
            h2 { "Mock Tests" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(data) => rsx! {
                    if let Some(resume) = data.resume.clone() {
                        div { class: "resume-banner",
                            span { "You have an attempt in progress: {resume.title}" }
                            Link {
                                class: "btn btn-primary",
                                to: Route::Attempt { test_id: resume.test_id },
                                "Resume"
                            }
                        }
                    }

                    if data.tests.is_empty() {
                        p { "No tests are open right now. Check back later." }
                    } else {
                        ul { class: "test-list",
                            for card in data.tests.clone() {
                                li { class: "test-card", key: "{card.test_id}",
                                    div { class: "test-card__info",
                                        h3 { "{card.title}" }
                                        p { class: "test-card__meta",
                                            "{card.question_label} · {card.duration_label} · {card.marking_label}"
                                        }
                                    }
                                    div { class: "test-card__actions",
                                        Link {
                                            class: "btn btn-primary",
                                            to: Route::Attempt { test_id: card.test_id },
                                            "Start Test"
                                        }
                                        Link {
                                            class: "btn btn-secondary",
                                            to: Route::Practice { test_id: card.test_id },
                                            "Practice"
                                        }
                                    }
                                }
                            }
                        }
                    }

                    if !data.recent.is_empty() {
                        h2 { "Recent Results" }
                        ul { class: "recent-results",
                            for row in data.recent.clone() {
                                li { key: "{row.result_id}",
                                    Link {
                                        to: Route::Result { result_id: row.result_id },
                                        "{row.title} — {row.score_label}"
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
