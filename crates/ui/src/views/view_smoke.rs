use exam_core::model::OptionKey;
use exam_core::model::QuestionStatus;
use storage::repository::{ResultRepository, SessionStore};

use crate::views::test_harness::{ViewKind, setup_view_harness};
use crate::vm::AttemptIntent;

async fn settle(harness: &mut super::test_harness::ViewHarness) {
    harness.rebuild();
    for _ in 0..8 {
        harness.drive_async().await;
    }
}

#[tokio::test]
async fn home_lists_the_seeded_test() {
    let mut harness = setup_view_harness(ViewKind::Home).await;
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Sample Mock Test"), "missing title: {html}");
    assert!(html.contains("Start Test"), "missing start action: {html}");
    assert!(html.contains("3 questions"), "missing meta: {html}");
}

#[tokio::test]
async fn attempt_renders_question_palette_and_timer() {
    let mut harness = setup_view_harness(ViewKind::Attempt(1)).await;
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("What is 2 + 2?"), "missing prompt: {html}");
    assert!(html.contains("Question 1 of 3"), "missing counter: {html}");
    // Full duration on a fresh attempt: 10 minutes.
    assert!(html.contains("10:00"), "missing timer: {html}");
    assert!(
        html.contains("Unattempted: 3"),
        "missing legend tally: {html}"
    );
}

#[tokio::test]
async fn attempt_select_marks_palette_and_persists() {
    let mut harness = setup_view_harness(ViewKind::Attempt(1)).await;
    settle(&mut harness).await;

    let handles = harness.attempt_handles.clone().expect("handles");
    handles.dispatch().call(AttemptIntent::Select(OptionKey::B));
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("option--selected"), "no selected option: {html}");
    assert!(html.contains("Answered: 1"), "legend not updated: {html}");

    // Saved after the mutation: reload-resume sees the same answer.
    let saved = harness
        .storage
        .sessions
        .load_session(harness.user_id, harness.test.id())
        .await
        .unwrap()
        .expect("slot occupied");
    assert_eq!(saved.answer(0).unwrap().answer(), Some(OptionKey::B));
    assert_eq!(saved.answer(0).unwrap().status(), QuestionStatus::Answered);
}

#[tokio::test]
async fn attempt_submit_persists_result_and_clears_slot() {
    let mut harness = setup_view_harness(ViewKind::Attempt(1)).await;
    settle(&mut harness).await;

    let handles = harness.attempt_handles.clone().expect("handles");
    handles.dispatch().call(AttemptIntent::Select(OptionKey::B));
    settle(&mut harness).await;
    handles.dispatch().call(AttemptIntent::Next);
    settle(&mut harness).await;
    handles.dispatch().call(AttemptIntent::ToggleMark);
    settle(&mut harness).await;

    handles.submit().call(());
    settle(&mut harness).await;

    let results = harness
        .storage
        .results
        .list_results(harness.user_id, 10)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    // One correct answer at 2 marks, nothing wrong.
    assert!((results[0].result.score() - 2.0).abs() < f64::EPSILON);
    assert_eq!(results[0].result.correct_count(), 1);

    let slot = harness
        .storage
        .sessions
        .active_session(harness.user_id)
        .await
        .unwrap();
    assert!(slot.is_none(), "slot should clear after submit");
}

#[tokio::test]
async fn practice_renders_prompt_without_early_feedback() {
    let mut harness = setup_view_harness(ViewKind::Practice(1)).await;
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("What is 2 + 2?"), "missing prompt: {html}");
    assert!(html.contains("Practice mode"), "missing mode note: {html}");
    // Nothing locked yet, so no feedback is visible.
    assert!(!html.contains("Correct!"), "feedback too early: {html}");
}

#[tokio::test]
async fn result_view_shows_solution_palette() {
    // The in-memory repository hands out sequential ids, so the first
    // appended result is row 1. Seed it before the screen's load runs.
    let mut harness = setup_view_harness(ViewKind::Result(1)).await;
    let test = harness.test.clone();
    let mut session = exam_core::model::SessionState::start(&test);
    session.select(OptionKey::B); // correct
    session.next();
    session.select(OptionKey::A); // incorrect
    let result =
        exam_core::model::TestResult::grade(&test, &session, exam_core::time::fixed_now());
    let result_id = harness
        .storage
        .results
        .append_result(harness.user_id, &result)
        .await
        .unwrap();
    assert_eq!(result_id, 1);

    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Sample Mock Test"), "missing title: {html}");
    assert!(html.contains("Correct: 1"), "missing legend: {html}");
    assert!(html.contains("Incorrect: 1"), "missing legend: {html}");
    assert!(html.contains("Unattempted: 1"), "missing legend: {html}");
}
