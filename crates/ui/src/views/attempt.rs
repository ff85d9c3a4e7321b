use dioxus::prelude::*;
use dioxus_router::use_navigator;

use exam_core::model::{Language, TickOutcome};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    AttemptIntent, AttemptVm, format_clock, indicator_class, live_legend_rows, start_attempt,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn AttemptView(test_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let user_id = ctx.user_id();
    let attempts = ctx.attempts();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<AttemptVm>);
    let confirming = use_signal(|| false);
    let submitting = use_signal(|| false);
    let mut timer = use_signal(|| None::<Task>);

    let attempts_for_resource = attempts.clone();
    let resource = use_resource(move || {
        let attempts = attempts_for_resource.clone();
        let mut vm = vm;
        let mut error = error;

        async move {
            let started = start_attempt(&attempts, user_id, test_id).await?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });

    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let attempts = attempts.clone();
        use_callback(move |intent: AttemptIntent| {
            let attempts = attempts.clone();
            let mut vm = vm;
            spawn(async move {
                // Take the vm out so no borrow is held across the save await.
                let taken = vm.write().take();
                let Some(mut value) = taken else {
                    return;
                };
                value.apply(&attempts, user_id, intent).await;
                vm.set(Some(value));
            });
        })
    };

    let do_submit = {
        let attempts = attempts.clone();
        use_callback(move |()| {
            let attempts = attempts.clone();
            let mut vm = vm;
            let mut error = error;
            let mut confirming = confirming;
            let mut submitting = submitting;
            let timer = timer;
            spawn(async move {
                if submitting() {
                    return;
                }
                submitting.set(true);
                confirming.set(false);

                let taken = vm.write().take();
                let Some(value) = taken else {
                    submitting.set(false);
                    return;
                };
                let outcome = value.submit(&attempts, user_id).await;
                // Put the attempt back first so a failed submit leaves a
                // usable screen with the same state.
                vm.set(Some(value));
                submitting.set(false);

                match outcome {
                    Ok(result_id) => {
                        if let Some(task) = timer.peek().as_ref() {
                            task.cancel();
                        }
                        navigator.push(Route::Result { result_id });
                    }
                    Err(err) => {
                        error.set(Some(err));
                    }
                }
            });
        })
    };

    // The countdown starts only after the one-shot loads resolved and the
    // attempt is fully formed. Expiry submits without confirmation.
    {
        let attempts = attempts.clone();
        use_effect(move || {
            let has_vm = vm.read().is_some();
            if !has_vm || timer.peek().is_some() {
                return;
            }
            let attempts = attempts.clone();
            let mut vm = vm;
            let task = spawn(async move {
                loop {
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    let taken = vm.write().take();
                    // The attempt may be mid-submit; skip this second.
                    let Some(mut value) = taken else {
                        continue;
                    };
                    let outcome = value.tick(&attempts, user_id).await;
                    vm.set(Some(value));
                    if outcome == TickOutcome::Expired {
                        do_submit.call(());
                        break;
                    }
                }
            });
            timer.set(Some(task));
        });
    }

    use_drop(move || {
        if let Some(task) = timer.peek().as_ref() {
            task.cancel();
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<AttemptTestHandles>() {
                handles.register(dispatch_intent, do_submit, vm);
            }
        }
    }

    let on_key = use_callback(move |evt: KeyboardEvent| {
        // Arrow navigation only drives the attempt itself; while the
        // confirmation dialog is up the keys are left alone.
        if confirming() || vm.read().is_none() {
            return;
        }
        match evt.data.key().to_string().as_str() {
            "ArrowRight" => {
                evt.prevent_default();
                dispatch_intent.call(AttemptIntent::Next);
            }
            "ArrowLeft" => {
                evt.prevent_default();
                dispatch_intent.call(AttemptIntent::Previous);
            }
            "Escape" => {
                evt.prevent_default();
                // Exit keeps the saved slot so the attempt stays resumable.
                navigator.push(Route::Home {});
            }
            _ => {}
        }
    });

    let vm_guard = vm.read();
    let view = vm_guard.as_ref().map(|vm| AttemptScreenData::from_vm(vm));
    drop(vm_guard);
    let confirming_now = confirming();
    let submitting_now = submitting();
    let error_now = *error.read();

    rsx! {
        div { class: "page attempt-page", id: "attempt-root", tabindex: "0", onkeydown: on_key,
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    // Load failure blocks the whole screen; no partial attempt.
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
                        if let Some(err) = error_now {
                            div { class: "error-banner",
                                span { "{err.message()}" }
                                button {
                                    class: "btn btn-secondary",
                                    id: "attempt-retry-submit",
                                    r#type: "button",
                                    disabled: submitting_now,
                                    onclick: move |_| do_submit.call(()),
                                    "Retry Submit"
                                }
                            }
                        }

                        AttemptHeader {
                            title: view.title.clone(),
                            timer_label: view.timer_label.clone(),
                            language: view.language,
                            resumed: view.resumed,
                            on_language: dispatch_intent,
                        }

                        div { class: "attempt-layout",
                            section { class: "question-panel",
                                QuestionPanel {
                                    data: view.clone(),
                                    on_intent: dispatch_intent,
                                }
                                footer { class: "question-panel__nav",
                                    button {
                                        class: "btn btn-secondary",
                                        id: "attempt-previous",
                                        r#type: "button",
                                        disabled: view.at_first,
                                        onclick: move |_| dispatch_intent.call(AttemptIntent::Previous),
                                        "Previous"
                                    }
                                    button {
                                        class: "btn btn-secondary",
                                        id: "attempt-next",
                                        r#type: "button",
                                        disabled: view.at_last,
                                        onclick: move |_| dispatch_intent.call(AttemptIntent::Next),
                                        "Next"
                                    }
                                    button {
                                        class: "btn btn-primary",
                                        id: "attempt-submit",
                                        r#type: "button",
                                        disabled: submitting_now,
                                        onclick: move |_| {
                                            let mut confirming = confirming;
                                            confirming.set(true);
                                        },
                                        "Submit Test"
                                    }
                                    button {
                                        class: "btn btn-ghost",
                                        id: "attempt-exit",
                                        r#type: "button",
                                        onclick: move |_| {
                                            navigator.push(Route::Home {});
                                        },
                                        "Exit"
                                    }
                                }
                            }
                            aside { class: "palette-panel",
                                Palette {
                                    dots: view.palette.clone(),
                                    current: view.index,
                                    legend_rows: view.legend_rows.clone(),
                                    on_jump: dispatch_intent,
                                }
                            }
                        }

                        if confirming_now {
                            SubmitConfirm {
                                total: view.summary_total,
                                attempted: view.summary_attempted,
                                unattempted: view.summary_unattempted,
                                remaining_label: view.timer_label.clone(),
                                submitting: submitting_now,
                                on_confirm: do_submit,
                                on_cancel: move |()| {
                                    let mut confirming = confirming;
                                    confirming.set(false);
                                },
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

/// Plain-data snapshot of the vm for rendering, cloned out of the signal so
/// rsx never borrows it.
#[derive(Clone, PartialEq)]
struct AttemptScreenData {
    title: String,
    timer_label: String,
    language: Language,
    resumed: bool,
    index: usize,
    count: usize,
    at_first: bool,
    at_last: bool,
    section: Option<String>,
    prompt: String,
    options: Vec<(exam_core::model::OptionKey, String, bool)>,
    marked: bool,
    palette: Vec<&'static str>,
    legend_rows: Vec<(&'static str, u32, &'static str)>,
    summary_total: usize,
    summary_attempted: usize,
    summary_unattempted: usize,
}

impl AttemptScreenData {
    fn from_vm(vm: &AttemptVm) -> Self {
        let language = vm.language();
        let question = vm.current_question();
        let selected = vm.selected_option();
        let options = exam_core::model::OptionKey::ALL
            .iter()
            .map(|key| {
                (
                    *key,
                    question.option(*key).get(language).to_string(),
                    selected == Some(*key),
                )
            })
            .collect();
        let indicators = vm.indicators();
        let legend = vm.legend();
        let summary = vm.submit_summary();

        Self {
            title: vm.test().title().get(language).to_string(),
            timer_label: format_clock(vm.seconds_remaining()),
            language,
            resumed: vm.resumed(),
            index: vm.current_index(),
            count: vm.question_count(),
            at_first: vm.current_index() == 0,
            at_last: vm.current_index() + 1 == vm.question_count(),
            section: question.section().map(str::to_string),
            prompt: question.prompt().get(language).to_string(),
            options,
            marked: vm.is_marked(),
            palette: indicators.iter().map(|i| indicator_class(*i)).collect(),
            legend_rows: live_legend_rows(&legend),
            summary_total: summary.total,
            summary_attempted: summary.attempted,
            summary_unattempted: summary.unattempted,
        }
    }
}

#[component]
fn AttemptHeader(
    title: String,
    timer_label: String,
    language: Language,
    resumed: bool,
    on_language: EventHandler<AttemptIntent>,
) -> Element {
    rsx! {
        header { class: "attempt-header",
            div { class: "attempt-header__heading",
                h2 { "{title}" }
                if resumed {
                    p { class: "attempt-header__resumed", "Resumed from your saved attempt." }
                }
            }
            div { class: "attempt-header__tools",
                div { class: "lang-toggle",
                    button {
                        class: if language == Language::English { "lang-toggle__btn lang-toggle__btn--active" } else { "lang-toggle__btn" },
                        r#type: "button",
                        onclick: move |_| on_language.call(AttemptIntent::SetLanguage(Language::English)),
                        "English"
                    }
                    button {
                        class: if language == Language::Hindi { "lang-toggle__btn lang-toggle__btn--active" } else { "lang-toggle__btn" },
                        r#type: "button",
                        onclick: move |_| on_language.call(AttemptIntent::SetLanguage(Language::Hindi)),
                        "हिंदी"
                    }
                }
                span { class: "attempt-timer", id: "attempt-timer", "{timer_label}" }
            }
        }
    }
}

#[component]
fn QuestionPanel(data: AttemptScreenData, on_intent: EventHandler<AttemptIntent>) -> Element {
    let number = data.index + 1;
    rsx! {
        div { class: "question",
            p { class: "question__counter",
                "Question {number} of {data.count}"
                if let Some(section) = data.section.clone() {
                    span { class: "question__section", " · {section}" }
                }
            }
            p { class: "question__prompt", "{data.prompt}" }
            ul { class: "question__options",
                for (key, text, selected) in data.options.clone() {
                    li { key: "{key}",
                        button {
                            class: if selected { "option option--selected" } else { "option" },
                            id: "attempt-option-{key}",
                            r#type: "button",
                            onclick: move |_| on_intent.call(AttemptIntent::Select(key)),
                            span { class: "option__key", "{key}" }
                            span { class: "option__text", "{text}" }
                        }
                    }
                }
            }
            button {
                class: if data.marked { "btn btn-mark btn-mark--active" } else { "btn btn-mark" },
                id: "attempt-mark",
                r#type: "button",
                onclick: move |_| on_intent.call(AttemptIntent::ToggleMark),
                if data.marked { "Unmark Review" } else { "Mark for Review" }
            }
        }
    }
}

#[component]
fn Palette(
    dots: Vec<&'static str>,
    current: usize,
    legend_rows: Vec<(&'static str, u32, &'static str)>,
    on_jump: EventHandler<AttemptIntent>,
) -> Element {
    rsx! {
        div { class: "palette",
            h3 { class: "palette__title", "Questions" }
            div { class: "palette__grid",
                for (index, class) in dots.iter().enumerate() {
                    button {
                        key: "{index}",
                        class: if index == current { "{class} palette-dot--current" } else { "{class}" },
                        r#type: "button",
                        onclick: move |_| on_jump.call(AttemptIntent::Jump(index)),
                        "{index + 1}"
                    }
                }
            }
            ul { class: "palette__legend",
                for (label, count, class) in legend_rows.clone() {
                    li { key: "{label}",
                        span { class: "{class}" }
                        span { "{label}: {count}" }
                    }
                }
            }
        }
    }
}

#[component]
fn SubmitConfirm(
    total: usize,
    attempted: usize,
    unattempted: usize,
    remaining_label: String,
    submitting: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "modal-overlay",
            div {
                class: "modal",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "submit-confirm-title",
                h3 { id: "submit-confirm-title", "Submit this test?" }
                dl { class: "summary",
                    dt { "Total questions" }
                    dd { "{total}" }
                    dt { "Attempted" }
                    dd { "{attempted}" }
                    dt { "Unattempted" }
                    dd { "{unattempted}" }
                    dt { "Time remaining" }
                    dd { "{remaining_label}" }
                }
                div { class: "modal__actions",
                    button {
                        class: "btn btn-primary",
                        id: "attempt-confirm-submit",
                        r#type: "button",
                        disabled: submitting,
                        onclick: move |_| on_confirm.call(()),
                        "Submit"
                    }
                    button {
                        class: "btn btn-secondary",
                        id: "attempt-cancel-submit",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Keep Attempting"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct AttemptTestHandles {
    dispatch: Rc<RefCell<Option<Callback<AttemptIntent>>>>,
    submit: Rc<RefCell<Option<Callback<()>>>>,
    vm: Rc<RefCell<Option<Signal<Option<AttemptVm>>>>>,
}

#[cfg(test)]
impl AttemptTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<AttemptIntent>,
        submit: Callback<()>,
        vm: Signal<Option<AttemptVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.submit.borrow_mut() = Some(submit);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<AttemptIntent> {
        (*self.dispatch.borrow()).expect("attempt dispatch registered")
    }

    pub(crate) fn submit(&self) -> Callback<()> {
        (*self.submit.borrow()).expect("attempt submit registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<AttemptVm>> {
        (*self.vm.borrow()).expect("attempt vm registered")
    }
}
