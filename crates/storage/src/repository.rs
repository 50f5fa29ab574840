use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use treatment_core::model::{Treatment, TreatmentId};
use treatment_core::store::StoreChange;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for treatments.
#[async_trait]
pub trait TreatmentRepository: Send + Sync {
    /// Insert a treatment or overwrite the one with the same id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the treatment cannot be stored.
    async fn upsert_treatment(&self, treatment: &Treatment) -> Result<(), StorageError>;

    /// Delete a treatment by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn delete_treatment(&self, id: TreatmentId) -> Result<(), StorageError>;

    /// All treatments, ordered by id (which is creation order).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if rows cannot be read or decoded.
    async fn list_treatments(&self) -> Result<Vec<Treatment>, StorageError>;

    /// Write a single store mutation through to storage.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying upsert or delete.
    async fn apply_change(&self, change: &StoreChange) -> Result<(), StorageError> {
        match change {
            StoreChange::Added(treatment) | StoreChange::Updated(treatment) => {
                self.upsert_treatment(treatment).await
            }
            StoreChange::Removed(id) => self.delete_treatment(*id).await,
        }
    }
}

/// Simple in-memory repository implementation for tests and unsaved sessions.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    treatments: Arc<Mutex<BTreeMap<TreatmentId, Treatment>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TreatmentRepository for InMemoryRepository {
    async fn upsert_treatment(&self, treatment: &Treatment) -> Result<(), StorageError> {
        let mut guard = self
            .treatments
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(treatment.id(), treatment.clone());
        Ok(())
    }

    async fn delete_treatment(&self, id: TreatmentId) -> Result<(), StorageError> {
        let mut guard = self
            .treatments
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }

    async fn list_treatments(&self) -> Result<Vec<Treatment>, StorageError> {
        let guard = self
            .treatments
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub treatments: Arc<dyn TreatmentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let treatments: Arc<dyn TreatmentRepository> = Arc::new(InMemoryRepository::new());
        Self { treatments }
    }
}
