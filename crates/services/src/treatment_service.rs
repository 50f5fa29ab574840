use std::sync::Arc;

use storage::repository::TreatmentRepository;
use treatment_core::model::{Treatment, TreatmentDraft, TreatmentId};
use treatment_core::store::{StoreChange, StoreError, TreatmentStore};

use crate::Clock;
use crate::error::TreatmentServiceError;

/// Treatments every new session starts with.
#[must_use]
pub fn seed_drafts() -> Vec<TreatmentDraft> {
    vec![
        TreatmentDraft {
            name: "Vitamins".into(),
            frequency: "Daily".into(),
            notes: "Take with breakfast".into(),
            reminders: true,
            manual_progress: "90".into(),
            ..TreatmentDraft::default()
        },
        TreatmentDraft {
            name: "Arm Exercises".into(),
            frequency: "Daily".into(),
            notes: "15 minutes morning and evening".into(),
            reminders: true,
            manual_progress: "94".into(),
            ..TreatmentDraft::default()
        },
    ]
}

/// Loads, seeds and persists treatments.
#[derive(Clone)]
pub struct TreatmentService {
    clock: Clock,
    treatments: Arc<dyn TreatmentRepository>,
}

impl TreatmentService {
    #[must_use]
    pub fn new(clock: Clock, treatments: Arc<dyn TreatmentRepository>) -> Self {
        Self { clock, treatments }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// List persisted treatments in display order.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentServiceError::Storage` if repository access fails.
    pub async fn list(&self) -> Result<Vec<Treatment>, TreatmentServiceError> {
        Ok(self.treatments.list_treatments().await?)
    }

    /// Build the session store, seeding defaults when nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentServiceError` if listing or seeding fails.
    pub async fn load_store(&self) -> Result<TreatmentStore, TreatmentServiceError> {
        let existing = self.list().await?;
        if !existing.is_empty() {
            tracing::debug!(count = existing.len(), "loaded treatments");
            return Ok(TreatmentStore::from_treatments(existing));
        }
        self.seed_defaults().await
    }

    /// Append the default treatments after whatever is already stored.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentServiceError` if a seed fails validation or cannot be stored.
    pub async fn seed_defaults(&self) -> Result<TreatmentStore, TreatmentServiceError> {
        let mut store = TreatmentStore::from_treatments(self.list().await?);
        let now = self.clock.now();
        for draft in seed_drafts() {
            let change = store.append(draft.validate(now)?)?;
            self.treatments.apply_change(&change).await?;
        }
        tracing::info!(count = store.len(), "seeded default treatments");
        Ok(store)
    }

    /// Validate and persist a new treatment at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentServiceError::Treatment` for invalid drafts.
    /// Returns `TreatmentServiceError::Storage` if persistence fails.
    pub async fn add(&self, draft: TreatmentDraft) -> Result<Treatment, TreatmentServiceError> {
        let validated = draft.validate(self.clock.now())?;
        let store = TreatmentStore::from_treatments(self.list().await?);
        let treatment = validated.assign_id(store.next_id()?);
        self.persist(&StoreChange::Added(treatment.clone())).await?;
        Ok(treatment)
    }

    /// Replace the fields of a persisted treatment, keeping its id and position.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentServiceError::Treatment` for invalid drafts.
    /// Returns `TreatmentServiceError::Store` if no treatment has that id.
    /// Returns `TreatmentServiceError::Storage` if persistence fails.
    pub async fn update(
        &self,
        id: TreatmentId,
        draft: TreatmentDraft,
    ) -> Result<Treatment, TreatmentServiceError> {
        let validated = draft.validate(self.clock.now())?;
        let mut store = TreatmentStore::from_treatments(self.list().await?);
        let change = store.replace(id, validated)?;
        self.persist(&change).await?;
        Ok(store.get(id).cloned().ok_or(StoreError::NotFound(id))?)
    }

    /// Delete a persisted treatment.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentServiceError::Storage` if the treatment is missing or
    /// the repository fails.
    pub async fn delete(&self, id: TreatmentId) -> Result<(), TreatmentServiceError> {
        self.persist(&StoreChange::Removed(id)).await
    }

    /// Write a store mutation through to the repository.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentServiceError::Storage` if the repository rejects it.
    pub async fn persist(&self, change: &StoreChange) -> Result<(), TreatmentServiceError> {
        self.treatments.apply_change(change).await?;
        match change {
            StoreChange::Added(t) => tracing::info!(id = %t.id(), name = %t.name(), "treatment added"),
            StoreChange::Updated(t) => tracing::info!(id = %t.id(), name = %t.name(), "treatment updated"),
            StoreChange::Removed(id) => tracing::info!(id = %id, "treatment removed"),
        }
        Ok(())
    }
}
