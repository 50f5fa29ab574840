use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use storage::repository::{InMemoryRepository, StorageError, TreatmentRepository};
use treatment_core::model::{Treatment, TreatmentId};

use super::test_harness::{ViewHarness, setup_view_harness};
use crate::vm::{BoardIntent, FieldInput, FormIntent};

/// Yields back to the executor a fixed number of times before completing.
struct Yield(u8);

impl Future for Yield {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 == 0 {
            return Poll::Ready(());
        }
        self.0 -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Repository whose writes take a few executor turns to land.
#[derive(Clone, Default)]
struct SlowRepo {
    inner: InMemoryRepository,
}

#[async_trait::async_trait]
impl TreatmentRepository for SlowRepo {
    async fn upsert_treatment(&self, treatment: &Treatment) -> Result<(), StorageError> {
        Yield(3).await;
        self.inner.upsert_treatment(treatment).await
    }

    async fn delete_treatment(&self, id: TreatmentId) -> Result<(), StorageError> {
        Yield(1).await;
        self.inner.delete_treatment(id).await
    }

    async fn list_treatments(&self) -> Result<Vec<Treatment>, StorageError> {
        self.inner.list_treatments().await
    }
}

/// Reads from an existing repository and rejects every write.
struct ReadOnlyRepo {
    inner: InMemoryRepository,
}

#[async_trait::async_trait]
impl TreatmentRepository for ReadOnlyRepo {
    async fn upsert_treatment(&self, _treatment: &Treatment) -> Result<(), StorageError> {
        Err(StorageError::Connection("read only".to_string()))
    }

    async fn delete_treatment(&self, _id: TreatmentId) -> Result<(), StorageError> {
        Err(StorageError::Connection("read only".to_string()))
    }

    async fn list_treatments(&self) -> Result<Vec<Treatment>, StorageError> {
        self.inner.list_treatments().await
    }
}

fn form(intent: FormIntent) -> BoardIntent {
    BoardIntent::Form(intent)
}

fn add_intents(name: &str) -> Vec<BoardIntent> {
    vec![
        form(FormIntent::Open),
        form(FormIntent::Input(FieldInput::Name(name.to_string()))),
        form(FormIntent::Save),
    ]
}

async fn add_named(harness: &mut ViewHarness, name: &str) {
    harness.dispatch_all(add_intents(name)).await;
}

async fn persisted_names(repo: &dyn TreatmentRepository) -> Vec<String> {
    repo.list_treatments()
        .await
        .expect("list treatments")
        .iter()
        .map(|t| t.name().to_string())
        .collect()
}

fn session_names(harness: &ViewHarness) -> Vec<String> {
    harness
        .board()
        .store()
        .iter()
        .map(|t| t.name().to_string())
        .collect()
}

#[tokio::test(flavor = "current_thread")]
async fn adding_physio_persists_and_rerenders_summary() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(Arc::new(repo.clone()));
    harness.settle().await;

    harness.dispatch(form(FormIntent::Open)).await;
    let html = harness.render();
    assert!(html.contains("treatment-form"), "form should be open: {html}");
    assert!(html.contains("Add Treatment Plan"), "missing title in {html}");

    harness
        .dispatch(form(FormIntent::Input(FieldInput::Name("Physio".into()))))
        .await;
    harness.dispatch(form(FormIntent::Save)).await;

    assert_eq!(
        persisted_names(&repo).await,
        ["Vitamins", "Arm Exercises", "Physio"]
    );
    let html = harness.render();
    assert!(
        html.contains("Your current treatment is 61% complete overall!"),
        "missing summary in {html}"
    );
    assert!(!html.contains("treatment-form"), "form should collapse: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn blank_save_and_cancel_leave_repository_untouched() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(Arc::new(repo.clone()));
    harness.settle().await;

    harness.dispatch(form(FormIntent::Open)).await;
    harness
        .dispatch(form(FormIntent::Input(FieldInput::Notes("later".into()))))
        .await;
    harness.dispatch(form(FormIntent::Save)).await;
    assert_eq!(repo.list_treatments().await.unwrap().len(), 2);
    assert!(!harness.board().form().is_open());

    harness.dispatch(form(FormIntent::Open)).await;
    harness
        .dispatch(form(FormIntent::Input(FieldInput::Name("Physio".into()))))
        .await;
    harness.dispatch(form(FormIntent::Cancel)).await;
    assert_eq!(repo.list_treatments().await.unwrap().len(), 2);

    let html = harness.render();
    assert!(
        html.contains("Your current treatment is 92% complete overall!"),
        "summary changed: {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn edit_saves_override_in_place() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(Arc::new(repo.clone()));
    harness.settle().await;

    harness.dispatch(BoardIntent::Edit(TreatmentId::new(1))).await;
    let html = harness.render();
    assert!(html.contains("Edit Treatment Plan"), "missing edit title in {html}");

    harness
        .dispatch(form(FormIntent::Input(FieldInput::ManualProgress(
            "100".into(),
        ))))
        .await;
    harness.dispatch(form(FormIntent::Save)).await;

    let stored = repo.list_treatments().await.unwrap();
    assert_eq!(stored[0].name().as_str(), "Vitamins");
    assert_eq!(stored[0].manual_progress().map(|p| p.value()), Some(100));
    assert!(
        harness
            .render()
            .contains("Your current treatment is 97% complete overall!")
    );
}

#[tokio::test(flavor = "current_thread")]
async fn slow_writes_land_in_dispatch_order() {
    let repo = SlowRepo::default();
    let mut harness = setup_view_harness(Arc::new(repo.clone()));
    harness.settle().await;

    // Added(3) then Removed(3): the delete must not overtake the insert.
    let mut intents = add_intents("Physio");
    intents.push(BoardIntent::Delete(TreatmentId::new(3)));
    harness.dispatch_all(intents).await;
    assert_eq!(persisted_names(&repo).await, ["Vitamins", "Arm Exercises"]);
    assert_eq!(persisted_names(&repo).await, session_names(&harness));

    // Removed(2) then Added(2): the freed id is reused by the new row.
    let mut intents = vec![BoardIntent::Delete(TreatmentId::new(2))];
    intents.extend(add_intents("Hydrotherapy"));
    harness.dispatch_all(intents).await;
    assert_eq!(persisted_names(&repo).await, ["Vitamins", "Hydrotherapy"]);
    assert_eq!(persisted_names(&repo).await, session_names(&harness));
}

#[tokio::test(flavor = "current_thread")]
async fn failed_write_shows_notice_and_keeps_session() {
    let inner = InMemoryRepository::new();
    let mut seeded = setup_view_harness(Arc::new(inner.clone()));
    seeded.settle().await;

    let mut harness = setup_view_harness(Arc::new(ReadOnlyRepo {
        inner: inner.clone(),
    }));
    harness.settle().await;
    add_named(&mut harness, "Physio").await;

    let html = harness.render();
    assert!(
        html.contains("Could not save your last change."),
        "missing notice in {html}"
    );
    assert!(
        html.contains("Your current treatment is 61% complete overall!"),
        "session should keep the row: {html}"
    );
    assert_eq!(inner.list_treatments().await.unwrap().len(), 2);
}
