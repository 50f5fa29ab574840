use std::sync::Arc;

use dioxus::prelude::*;
use storage::repository::{InMemoryRepository, StorageError, TreatmentRepository};
use treatment_core::model::{Treatment, TreatmentDraft, TreatmentId};
use treatment_core::store::TreatmentStore;
use treatment_core::time::{fixed_clock, fixed_now};

use super::test_harness::{drive_dom, setup_view_harness};
use crate::views::TreatmentList;
use crate::vm::{TreatmentListVm, render_treatments};

#[tokio::test(flavor = "current_thread")]
async fn treatments_view_seeds_and_renders_summary() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(Arc::new(repo.clone()));
    harness.settle().await;

    let html = harness.render();
    let expected = "Your current treatment is 92% complete overall!";
    assert!(html.contains(expected), "missing {expected} in {html}");
    assert!(html.contains("Vitamins"), "missing Vitamins in {html}");
    assert!(html.contains("Arm Exercises"), "missing Arm Exercises in {html}");
    assert!(html.contains("width: 94%"), "missing bar fill in {html}");
    assert!(html.contains("add-treatment-btn"), "missing add button in {html}");
    assert!(!html.contains("treatment-form"), "form should start collapsed: {html}");
    assert_eq!(repo.list_treatments().await.unwrap().len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn treatments_view_uses_persisted_rows_without_reseeding() {
    let repo = InMemoryRepository::new();
    let physio = TreatmentDraft::named("Physio")
        .validate(fixed_now())
        .unwrap()
        .assign_id(TreatmentId::new(1));
    repo.upsert_treatment(&physio).await.unwrap();

    let mut harness = setup_view_harness(Arc::new(repo));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Physio"), "missing Physio in {html}");
    assert!(!html.contains("Vitamins"), "unexpected seed in {html}");
    assert!(
        html.contains("Your current treatment is 0% complete overall!"),
        "missing summary in {html}"
    );
    assert!(html.contains("As needed"), "missing default frequency in {html}");
    assert_eq!(harness.treatments.list().await.unwrap().len(), 1);
}

/// Never finishes listing.
struct StalledRepo;

#[async_trait::async_trait]
impl TreatmentRepository for StalledRepo {
    async fn upsert_treatment(&self, _treatment: &Treatment) -> Result<(), StorageError> {
        Ok(())
    }

    async fn delete_treatment(&self, _id: TreatmentId) -> Result<(), StorageError> {
        Ok(())
    }

    async fn list_treatments(&self) -> Result<Vec<Treatment>, StorageError> {
        std::future::pending().await
    }
}

#[tokio::test(flavor = "current_thread")]
async fn treatments_view_shows_loading_until_store_arrives() {
    let mut harness = setup_view_harness(Arc::new(StalledRepo));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Loading..."), "missing loading text in {html}");
    assert!(!html.contains("Idle"), "unexpected idle text in {html}");
}

struct FailingRepo;

#[async_trait::async_trait]
impl TreatmentRepository for FailingRepo {
    async fn upsert_treatment(&self, _treatment: &Treatment) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn delete_treatment(&self, _id: TreatmentId) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_treatments(&self) -> Result<Vec<Treatment>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn treatments_view_shows_error_when_loading_fails() {
    let mut harness = setup_view_harness(Arc::new(FailingRepo));
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Something went wrong. Please try again."),
        "missing error message in {html}"
    );
    assert!(!html.contains("treatments-list"), "unexpected list in {html}");
}

#[derive(Props, Clone, PartialEq)]
struct ListHarnessProps {
    list: TreatmentListVm,
}

#[component]
fn ListHarness(props: ListHarnessProps) -> Element {
    rsx! {
        TreatmentList { list: props.list, on_edit: move |_| {}, on_delete: move |_| {} }
    }
}

#[test]
fn treatment_list_renders_row_details() {
    let mut store = TreatmentStore::new();
    let draft = TreatmentDraft {
        name: "Vitamins".into(),
        frequency: "Daily".into(),
        start_date: "2026-09-19".into(),
        end_date: "2026-10-19".into(),
        ..TreatmentDraft::default()
    };
    store.append(draft.validate(fixed_now()).unwrap()).unwrap();
    let list = render_treatments(&store, fixed_clock().today());

    let mut dom = VirtualDom::new_with_props(ListHarness, ListHarnessProps { list });
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    let html = dioxus_ssr::render(&dom);

    assert!(html.contains("Vitamins"), "missing name in {html}");
    assert!(html.contains("90%"), "missing percentage in {html}");
    assert!(html.contains("width: 90%"), "missing fill in {html}");
    assert!(html.contains("Daily • 3 days remaining"), "missing status in {html}");
    assert!(
        html.contains("Sep 19, 2026 → Oct 19, 2026"),
        "missing dates in {html}"
    );
}
