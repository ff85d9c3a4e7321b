use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use chrono::Duration;
use exam_core::model::{
    Bilingual, OptionKey, Question, QuestionId, Test, TestId, TestStatus, UserId,
};
use exam_core::time::{fixed_clock, fixed_now};
use services::{AppServices, PracticeService, ResultService, TestAttemptService, TestCatalogService};
use storage::repository::{Storage, TestRepository};

use crate::context::{UiApp, build_app_context};
use crate::views::attempt::AttemptTestHandles;
use crate::views::{AttemptView, HomeView, PracticeView, ResultView};

#[derive(Clone)]
struct TestApp {
    user_id: UserId,
    services: AppServices,
}

impl UiApp for TestApp {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn attempts(&self) -> Arc<TestAttemptService> {
        self.services.attempts()
    }

    fn catalog(&self) -> Arc<TestCatalogService> {
        self.services.catalog()
    }

    fn practice(&self) -> Arc<PracticeService> {
        self.services.practice()
    }

    fn results(&self) -> Arc<ResultService> {
        self.services.results()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Attempt(u64),
    Practice(u64),
    Result(i64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    attempt_handles: Option<AttemptTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.attempt_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
    // Views navigate to app routes the harness does not model (e.g. the
    // result screen after submit); swallow those instead of failing.
    #[route("/:..segments")]
    Sink { segments: Vec<String> },
}

#[component]
fn Sink(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        p { "navigated away: /{path}" }
    }
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Attempt(test_id) => rsx! { AttemptView { test_id } },
        ViewKind::Practice(test_id) => rsx! { PracticeView { test_id } },
        ViewKind::Result(result_id) => rsx! { ResultView { result_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub user_id: UserId,
    pub test: Test,
    pub attempt_handles: Option<AttemptTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn sample_test() -> Test {
    let questions = vec![
        Question::new(
            QuestionId::new(1),
            Bilingual::new("What is 2 + 2?", "2 + 2 कितना है?").unwrap(),
            [
                Bilingual::english_only("3").unwrap(),
                Bilingual::english_only("4").unwrap(),
                Bilingual::english_only("5").unwrap(),
                Bilingual::english_only("6").unwrap(),
            ],
            OptionKey::B,
            Some(Bilingual::english_only("Basic addition.").unwrap()),
            Some("Maths".to_string()),
        )
        .unwrap(),
        Question::new(
            QuestionId::new(2),
            Bilingual::english_only("Which planet is the largest?").unwrap(),
            [
                Bilingual::english_only("Earth").unwrap(),
                Bilingual::english_only("Mars").unwrap(),
                Bilingual::english_only("Jupiter").unwrap(),
                Bilingual::english_only("Venus").unwrap(),
            ],
            OptionKey::C,
            None,
            Some("Science".to_string()),
        )
        .unwrap(),
        Question::new(
            QuestionId::new(3),
            Bilingual::english_only("Pick A.").unwrap(),
            [
                Bilingual::english_only("A it is").unwrap(),
                Bilingual::english_only("Not this").unwrap(),
                Bilingual::english_only("Nor this").unwrap(),
                Bilingual::english_only("Definitely not").unwrap(),
            ],
            OptionKey::A,
            None,
            None,
        )
        .unwrap(),
    ];
    Test::new(
        TestId::new(1),
        Bilingual::new("Sample Mock Test", "नमूना मॉक टेस्ट").unwrap(),
        questions,
        10,
        2.0,
        0.5,
        TestStatus::Published,
        Some(fixed_now() - Duration::hours(1)),
        Some(fixed_now() + Duration::days(30)),
        fixed_now(),
    )
    .unwrap()
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let storage = Storage::in_memory();
    let test = sample_test();
    storage
        .tests
        .upsert_test(&test)
        .await
        .expect("seed test");

    let services = AppServices::from_storage(fixed_clock(), &storage);
    let user_id = UserId::random();

    let attempt_handles = match view {
        ViewKind::Attempt(_) => Some(AttemptTestHandles::default()),
        _ => None,
    };

    let app = Arc::new(TestApp { user_id, services });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            attempt_handles: attempt_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        user_id,
        test,
        attempt_handles,
    }
}
