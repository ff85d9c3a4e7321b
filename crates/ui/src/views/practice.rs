use dioxus::prelude::*;
use dioxus_router::use_navigator;

use exam_core::model::{Language, PracticeStatus};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PracticeIntent, PracticeVm, practice_status_class, start_practice};

#[component]
pub fn PracticeView(test_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let practice = ctx.practice();

    let vm = use_signal(|| None::<PracticeVm>);

    let resource = use_resource(move || {
        let practice = practice.clone();
        let mut vm = vm;

        async move {
            let started = start_practice(&practice, test_id).await?;
            vm.set(Some(started));
            Ok::<_, ViewError>(())
        }
    });

    let state = view_state_from_resource(&resource);

    // Practice mutations are synchronous; no persistence, no timer.
    let dispatch_intent = use_callback(move |intent: PracticeIntent| {
        let mut vm = vm;
        if let Some(vm) = vm.write().as_mut() {
            vm.apply(intent);
        }
    });

    let vm_guard = vm.read();
    let view = vm_guard.as_ref().map(PracticeScreenData::from_vm);
    drop(vm_guard);

    rsx! {
        div { class: "page practice-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "blocking-error",
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
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            onclick: move |_| {
                                navigator.push(Route::Home {});
                            },
                            "Back"
                        }
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(view) = view {
                        header { class: "attempt-header",
                            div { class: "attempt-header__heading",
                                h2 { "{view.title}" }
                                p { class: "attempt-header__resumed", "Practice mode — answers lock as soon as you pick one." }
                            }
                            div { class: "attempt-header__tools",
                                div { class: "lang-toggle",
                                    button {
                                        class: if view.language == Language::English { "lang-toggle__btn lang-toggle__btn--active" } else { "lang-toggle__btn" },
                                        r#type: "button",
                                        onclick: move |_| dispatch_intent.call(PracticeIntent::SetLanguage(Language::English)),
                                        "English"
                                    }
                                    button {
                                        class: if view.language == Language::Hindi { "lang-toggle__btn lang-toggle__btn--active" } else { "lang-toggle__btn" },
                                        r#type: "button",
                                        onclick: move |_| dispatch_intent.call(PracticeIntent::SetLanguage(Language::Hindi)),
                                        "हिंदी"
                                    }
                                }
                                button {
                                    class: "btn btn-ghost",
                                    r#type: "button",
                                    onclick: move |_| {
                                        navigator.push(Route::Home {});
                                    },
                                    "Exit"
                                }
                            }
                        }

                        if view.complete {
                            PracticeSummaryPanel { data: view.clone() }
                        }

                        div { class: "attempt-layout",
                            section { class: "question-panel",
                                PracticeQuestion { data: view.clone(), on_intent: dispatch_intent }
                                footer { class: "question-panel__nav",
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        disabled: view.at_first,
                                        onclick: move |_| dispatch_intent.call(PracticeIntent::Previous),
                                        "Previous"
                                    }
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        disabled: view.at_last,
                                        onclick: move |_| dispatch_intent.call(PracticeIntent::Next),
                                        "Next"
                                    }
                                }
                            }
                            aside { class: "palette-panel",
                                div { class: "palette",
                                    h3 { class: "palette__title", "Questions" }
                                    div { class: "palette__grid",
                                        for (index, class) in view.palette.iter().enumerate() {
                                            button {
                                                key: "{index}",
                                                class: if index == view.index { "{class} palette-dot--current" } else { "{class}" },
                                                r#type: "button",
                                                onclick: move |_| dispatch_intent.call(PracticeIntent::Jump(index)),
                                                "{index + 1}"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    } else {
                        p { "Loading..." }
                    }
                },
            }
        }
    }
}

#[derive(Clone, PartialEq)]
struct PracticeScreenData {
    title: String,
    language: Language,
    index: usize,
    count: usize,
    at_first: bool,
    at_last: bool,
    prompt: String,
    options: Vec<OptionRow>,
    locked: bool,
    status: PracticeStatus,
    explanation: Option<String>,
    palette: Vec<&'static str>,
    complete: bool,
    correct: u32,
    incorrect: u32,
    unattempted: u32,
    correct_pct: f64,
    incorrect_pct: f64,
    unattempted_pct: f64,
}

#[derive(Clone, PartialEq)]
struct OptionRow {
    key: exam_core::model::OptionKey,
    text: String,
    selected: bool,
    reveal_correct: bool,
    reveal_incorrect: bool,
}

impl PracticeScreenData {
    fn from_vm(vm: &PracticeVm) -> Self {
        let language = vm.language();
        let question = vm.current_question();
        let locked = vm.locked_selection().is_some();
        let options = exam_core::model::OptionKey::ALL
            .iter()
            .map(|key| {
                let selected = vm.locked_selection() == Some(*key);
                OptionRow {
                    key: *key,
                    text: question.option(*key).get(language).to_string(),
                    selected,
                    // Correctness is only revealed once the question locks.
                    reveal_correct: locked && *key == question.correct(),
                    reveal_incorrect: locked && selected && *key != question.correct(),
                }
            })
            .collect();
        let summary = vm.summary();

        Self {
            title: vm.test().title().get(language).to_string(),
            language,
            index: vm.current_index(),
            count: vm.question_count(),
            at_first: vm.current_index() == 0,
            at_last: vm.current_index() + 1 == vm.question_count(),
            prompt: question.prompt().get(language).to_string(),
            options,
            locked,
            status: vm.current_status(),
            explanation: question
                .explanation()
                .map(|text| text.get(language).to_string()),
            palette: vm
                .statuses()
                .iter()
                .map(|s| practice_status_class(*s))
                .collect(),
            complete: vm.is_complete(),
            correct: summary.correct,
            incorrect: summary.incorrect,
            unattempted: summary.unattempted,
            correct_pct: summary.correct_fraction() * 100.0,
            incorrect_pct: summary.incorrect_fraction() * 100.0,
            unattempted_pct: summary.unattempted_fraction() * 100.0,
        }
    }
}

#[component]
fn PracticeQuestion(data: PracticeScreenData, on_intent: EventHandler<PracticeIntent>) -> Element {
    let number = data.index + 1;
    rsx! {
        div { class: "question",
            p { class: "question__counter", "Question {number} of {data.count}" }
            p { class: "question__prompt", "{data.prompt}" }
            ul { class: "question__options",
                for option in data.options.clone() {
                    li { key: "{option.key}",
                        button {
                            class: practice_option_class(&option),
                            r#type: "button",
                            disabled: data.locked,
                            onclick: move |_| on_intent.call(PracticeIntent::Select(option.key)),
                            span { class: "option__key", "{option.key}" }
                            span { class: "option__text", "{option.text}" }
                        }
                    }
                }
            }
            if data.locked {
                div { class: "practice-feedback",
                    match data.status {
                        PracticeStatus::Correct => rsx! {
                            p { class: "practice-feedback__correct", "Correct!" }
                        },
                        PracticeStatus::Incorrect => rsx! {
                            p { class: "practice-feedback__incorrect", "Incorrect." }
                        },
                        PracticeStatus::Unattempted => rsx! {},
                    }
                    if let Some(explanation) = data.explanation.clone() {
                        p { class: "practice-feedback__explanation", "{explanation}" }
                    }
                }
            }
        }
    }
}

fn practice_option_class(option: &OptionRow) -> &'static str {
    if option.reveal_correct {
        "option option--correct"
    } else if option.reveal_incorrect {
        "option option--incorrect"
    } else if option.selected {
        "option option--selected"
    } else {
        "option"
    }
}

#[component]
fn PracticeSummaryPanel(data: PracticeScreenData) -> Element {
    rsx! {
        div { class: "practice-summary",
            h3 { "All questions answered" }
            dl { class: "summary",
                dt { "Correct" }
                dd { "{data.correct}" }
                dt { "Incorrect" }
                dd { "{data.incorrect}" }
                dt { "Unattempted" }
                dd { "{data.unattempted}" }
            }
            div { class: "practice-summary__bar",
                span {
                    class: "practice-summary__segment practice-summary__segment--correct",
                    style: "width: {data.correct_pct}%",
                }
                span {
                    class: "practice-summary__segment practice-summary__segment--incorrect",
                    style: "width: {data.incorrect_pct}%",
                }
                span {
                    class: "practice-summary__segment practice-summary__segment--unattempted",
                    style: "width: {data.unattempted_pct}%",
                }
            }
        }
    }
}
