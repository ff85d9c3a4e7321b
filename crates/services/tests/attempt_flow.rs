use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use exam_core::model::{
    Bilingual, OptionKey, Question, QuestionId, QuestionStatus, Test, TestId, TestResult,
    TestStatus, UserId,
};
use exam_core::time::{fixed_clock, fixed_now};
use services::{AttemptEvent, TestAttemptService};
use storage::repository::{
    InMemoryRepository, ResultId, ResultRepository, ResultRow, StorageError, TestRepository,
};

fn build_question(id: u64, correct: OptionKey) -> Question {
    Question::new(
        QuestionId::new(id),
        Bilingual::english_only(format!("Q{id}")).unwrap(),
        [
            Bilingual::english_only("a").unwrap(),
            Bilingual::english_only("b").unwrap(),
            Bilingual::english_only("c").unwrap(),
            Bilingual::english_only("d").unwrap(),
        ],
        correct,
        None,
        None,
    )
    .unwrap()
}

fn build_test() -> Test {
    Test::new(
        TestId::new(1),
        Bilingual::english_only("Smoke Test").unwrap(),
        vec![
            build_question(1, OptionKey::B),
            build_question(2, OptionKey::A),
            build_question(3, OptionKey::D),
        ],
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

/// Result sink that fails every append until `healed` flips.
#[derive(Clone)]
struct FlakyResultSink {
    inner: InMemoryRepository,
    healed: Arc<AtomicBool>,
}

#[async_trait]
impl ResultRepository for FlakyResultSink {
    async fn append_result(
        &self,
        user: UserId,
        result: &TestResult,
    ) -> Result<ResultId, StorageError> {
        if !self.healed.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("sink offline".into()));
        }
        self.inner.append_result(user, result).await
    }

    async fn get_result(&self, id: ResultId) -> Result<ResultRow, StorageError> {
        self.inner.get_result(id).await
    }

    async fn list_results(&self, user: UserId, limit: u32) -> Result<Vec<ResultRow>, StorageError> {
        self.inner.list_results(user, limit).await
    }
}

#[tokio::test]
async fn full_attempt_flow_persists_result_and_clears_slot() {
    let repo = InMemoryRepository::new();
    let test = build_test();
    repo.upsert_test(&test).await.unwrap();

    let svc = TestAttemptService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );
    let user = UserId::random();

    // Start a 3-question test (600s): answer Q1 correctly, mark Q2 without
    // answering, leave Q3 untouched.
    let mut attempt = svc.start_or_resume(user, test.id()).await.unwrap();
    assert_eq!(attempt.session.seconds_remaining(), 600);

    svc.apply(user, &mut attempt.session, AttemptEvent::Select(OptionKey::B))
        .await;
    svc.apply(user, &mut attempt.session, AttemptEvent::Next)
        .await;
    svc.apply(user, &mut attempt.session, AttemptEvent::ToggleMark)
        .await;

    let statuses: Vec<QuestionStatus> = attempt
        .session
        .answers()
        .iter()
        .map(|a| a.status())
        .collect();
    assert_eq!(
        statuses,
        vec![
            QuestionStatus::Answered,
            QuestionStatus::Marked,
            QuestionStatus::Unattempted,
        ]
    );

    let submitted = svc
        .submit(user, &attempt.test, &attempt.session)
        .await
        .unwrap();
    assert!((submitted.result.score() - 1.0).abs() < f64::EPSILON);
    assert_eq!(submitted.result.correct_count(), 1);
    assert_eq!(submitted.result.incorrect_count(), 0);
    assert!((submitted.result.percentage() - 100.0 / 3.0).abs() < 1e-9);

    // Slot cleared, result readable.
    assert!(svc.active_session(user).await.unwrap().is_none());
    let row = repo.get_result(submitted.result_id).await.unwrap();
    assert_eq!(row.result, submitted.result);
}

#[tokio::test]
async fn failed_submit_keeps_the_slot_and_can_be_retried() {
    let repo = InMemoryRepository::new();
    let test = build_test();
    repo.upsert_test(&test).await.unwrap();

    let healed = Arc::new(AtomicBool::new(false));
    let sink = FlakyResultSink {
        inner: repo.clone(),
        healed: Arc::clone(&healed),
    };

    let svc = TestAttemptService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(sink),
    );
    let user = UserId::random();

    let mut attempt = svc.start_or_resume(user, test.id()).await.unwrap();
    svc.apply(user, &mut attempt.session, AttemptEvent::Select(OptionKey::B))
        .await;

    // Sink down: submit fails and the durable slot must survive, so the
    // attempt is not lost.
    let err = svc.submit(user, &attempt.test, &attempt.session).await;
    assert!(err.is_err());
    assert!(svc.active_session(user).await.unwrap().is_some());

    // Same submit call retried after the sink recovers.
    healed.store(true, Ordering::SeqCst);
    let submitted = svc
        .submit(user, &attempt.test, &attempt.session)
        .await
        .unwrap();
    assert!(svc.active_session(user).await.unwrap().is_none());
    assert_eq!(
        repo.get_result(submitted.result_id).await.unwrap().result,
        submitted.result
    );
}

#[tokio::test]
async fn exit_keeps_the_slot_for_later_resume() {
    let repo = InMemoryRepository::new();
    let test = build_test();
    repo.upsert_test(&test).await.unwrap();

    let svc = TestAttemptService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );
    let user = UserId::random();

    let mut attempt = svc.start_or_resume(user, test.id()).await.unwrap();
    svc.apply(user, &mut attempt.session, AttemptEvent::Select(OptionKey::C))
        .await;
    for _ in 0..30 {
        svc.tick(user, &mut attempt.session).await;
    }

    // Abandoning is just dropping the in-memory state; nothing is scored
    // and the slot stays for later.
    drop(attempt);

    let resumed = svc.start_or_resume(user, test.id()).await.unwrap();
    assert!(resumed.resumed);
    assert_eq!(resumed.session.seconds_remaining(), 570);
    assert_eq!(
        resumed.session.answer(0).unwrap().answer(),
        Some(OptionKey::C)
    );
}
