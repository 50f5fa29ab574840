use treatment_core::model::{Treatment, TreatmentId};

use super::SqliteRepository;
use super::mapping::{map_treatment_row, treatment_id_to_i64};
use crate::repository::{StorageError, TreatmentRepository};

#[async_trait::async_trait]
impl TreatmentRepository for SqliteRepository {
    async fn upsert_treatment(&self, treatment: &Treatment) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO treatments (
                id, name, frequency, start_date, end_date, notes,
                reminders, caregiver_notifications, manual_progress, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                -- created_at is fixed at first insert
                name = excluded.name,
                frequency = excluded.frequency,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                notes = excluded.notes,
                reminders = excluded.reminders,
                caregiver_notifications = excluded.caregiver_notifications,
                manual_progress = excluded.manual_progress
            ",
        )
        .bind(treatment_id_to_i64(treatment.id())?)
        .bind(treatment.name().as_str())
        .bind(treatment.frequency())
        .bind(treatment.start_date())
        .bind(treatment.end_date())
        .bind(treatment.notes())
        .bind(i64::from(treatment.reminders()))
        .bind(i64::from(treatment.caregiver_notifications()))
        .bind(treatment.manual_progress().map(i64::from))
        .bind(treatment.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn delete_treatment(&self, id: TreatmentId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM treatments WHERE id = ?1")
            .bind(treatment_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn list_treatments(&self) -> Result<Vec<Treatment>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT
                id, name, frequency, start_date, end_date, notes,
                reminders, caregiver_notifications, manual_progress, created_at
            FROM treatments
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_treatment_row).collect()
    }
}
