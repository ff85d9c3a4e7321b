use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AttemptView, HomeView, PracticeView, ResultView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/attempt/:test_id", AttemptView)] Attempt { test_id: u64 },
        #[route("/practice/:test_id", PracticeView)] Practice { test_id: u64 },
        #[route("/result/:result_id", ResultView)] Result { result_id: i64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { class: "topbar__brand", Link { to: Route::Home {}, "Exam Prep" } }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
