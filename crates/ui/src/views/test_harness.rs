use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{Clock, TreatmentService};
use storage::repository::TreatmentRepository;
use treatment_core::time::fixed_clock;

use crate::context::{UiApp, build_app_context};
use crate::views::TreatmentsView;
use crate::views::treatments::BoardTestHandles;
use crate::vm::{BoardIntent, TreatmentBoardVm};

#[derive(Clone)]
struct TestApp {
    clock: Clock,
    treatments: Arc<TreatmentService>,
}

impl UiApp for TestApp {
    fn clock(&self) -> Clock {
        self.clock
    }

    fn treatments(&self) -> Arc<TreatmentService> {
        Arc::clone(&self.treatments)
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: BoardTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn TreatmentsHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { TreatmentsView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub treatments: Arc<TreatmentService>,
    handles: BoardTestHandles,
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

    /// Rebuild and let the load resource settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    /// Send an intent to the mounted board, then let queued writes finish.
    pub async fn dispatch(&mut self, intent: BoardIntent) {
        self.dispatch_all([intent]).await;
    }

    /// Send several intents back to back before any queued write can run.
    pub async fn dispatch_all(&mut self, intents: impl IntoIterator<Item = BoardIntent>) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| {
            for intent in intents {
                dispatch.call(intent);
            }
        });
        drive_dom(&mut self.dom);
        for _ in 0..5 {
            self.drive_async().await;
        }
    }

    pub fn board(&self) -> TreatmentBoardVm {
        self.dom.in_runtime(|| self.handles.board())
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

pub fn setup_view_harness(repo: Arc<dyn TreatmentRepository>) -> ViewHarness {
    let clock = fixed_clock();
    let treatments = Arc::new(TreatmentService::new(clock, repo));
    let app = Arc::new(TestApp {
        clock,
        treatments: Arc::clone(&treatments),
    });

    let handles = BoardTestHandles::default();
    let dom = VirtualDom::new_with_props(
        TreatmentsHarness,
        ViewHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        treatments,
        handles,
    }
}
