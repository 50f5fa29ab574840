//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use treatment_core::model::TreatmentError;
use treatment_core::store::StoreError;

/// Errors emitted by `TreatmentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TreatmentServiceError {
    #[error(transparent)]
    Treatment(#[from] TreatmentError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Treatment(#[from] TreatmentServiceError),
}
