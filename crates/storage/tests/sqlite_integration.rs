use chrono::NaiveDate;
use storage::repository::{StorageError, TreatmentRepository};
use storage::sqlite::SqliteRepository;
use treatment_core::model::{Treatment, TreatmentDraft, TreatmentId};
use treatment_core::time::fixed_now;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn build_treatment(id: u64, draft: TreatmentDraft) -> Treatment {
    draft
        .validate(fixed_now())
        .unwrap()
        .assign_id(TreatmentId::new(id))
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_every_field() {
    let repo = connect("memdb_roundtrip").await;

    let treatment = build_treatment(
        1,
        TreatmentDraft {
            name: "Arm Exercises".into(),
            frequency: "Daily".into(),
            start_date: "2026-08-21".into(),
            end_date: "2026-10-20".into(),
            notes: "15 minutes morning and evening".into(),
            reminders: true,
            caregiver_notifications: true,
            manual_progress: "94".into(),
        },
    );
    repo.upsert_treatment(&treatment).await.unwrap();

    let fetched = repo.list_treatments().await.expect("list");
    assert_eq!(fetched.len(), 1);
    let fetched = &fetched[0];
    assert_eq!(fetched, &treatment);
    assert_eq!(
        fetched.start_date(),
        NaiveDate::from_ymd_opt(2026, 8, 21)
    );
    assert_eq!(fetched.manual_progress().map(|p| p.value()), Some(94));
}

#[tokio::test]
async fn sqlite_upsert_overwrites_and_keeps_order() {
    let repo = connect("memdb_upsert").await;

    repo.upsert_treatment(&build_treatment(2, TreatmentDraft::named("Arm Exercises")))
        .await
        .unwrap();
    repo.upsert_treatment(&build_treatment(1, TreatmentDraft::named("Vitamins")))
        .await
        .unwrap();
    repo.upsert_treatment(&build_treatment(1, TreatmentDraft::named("Vitamin D")))
        .await
        .unwrap();

    let names: Vec<String> = repo
        .list_treatments()
        .await
        .unwrap()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(names, ["Vitamin D", "Arm Exercises"]);
}

#[tokio::test]
async fn sqlite_delete_reports_missing_rows() {
    let repo = connect("memdb_delete").await;

    repo.upsert_treatment(&build_treatment(1, TreatmentDraft::named("Physio")))
        .await
        .unwrap();
    repo.delete_treatment(TreatmentId::new(1)).await.unwrap();
    assert!(repo.list_treatments().await.unwrap().is_empty());

    let err = repo.delete_treatment(TreatmentId::new(1)).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
