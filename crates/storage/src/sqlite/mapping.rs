use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use treatment_core::model::{Treatment, TreatmentId};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn treatment_id_from_i64(v: i64) -> Result<TreatmentId, StorageError> {
    u64::try_from(v)
        .map(TreatmentId::new)
        .map_err(|_| StorageError::Serialization("treatment_id sign overflow".into()))
}

pub(crate) fn treatment_id_to_i64(id: TreatmentId) -> Result<i64, StorageError> {
    i64::try_from(id.value())
        .map_err(|_| StorageError::Serialization("treatment_id overflow".into()))
}

pub(crate) fn map_treatment_row(row: &SqliteRow) -> Result<Treatment, StorageError> {
    let id = treatment_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let start_date: Option<NaiveDate> = row.try_get("start_date").map_err(ser)?;
    let end_date: Option<NaiveDate> = row.try_get("end_date").map_err(ser)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(ser)?;

    Treatment::from_persisted(
        id,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<String, _>("frequency").map_err(ser)?,
        start_date,
        end_date,
        row.try_get::<String, _>("notes").map_err(ser)?,
        row.try_get::<i64, _>("reminders").map_err(ser)? != 0,
        row.try_get::<i64, _>("caregiver_notifications").map_err(ser)? != 0,
        row.try_get::<Option<i64>, _>("manual_progress").map_err(ser)?,
        created_at,
    )
    .map_err(ser)
}
