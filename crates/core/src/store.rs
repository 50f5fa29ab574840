//! Ordered, session-scoped collection of treatments.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Treatment, TreatmentId, ValidatedTreatment};
use crate::progress::{Progress, mean_progress};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("treatment {0} not found")]
    NotFound(TreatmentId),

    #[error("no treatment ids left after {0}")]
    IdsExhausted(TreatmentId),
}

/// One mutation applied to a [`TreatmentStore`].
///
/// Returned by every mutating call so the caller can write the same change
/// through to persistent storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(Treatment),
    Updated(Treatment),
    Removed(TreatmentId),
}

/// Treatments in display order, owned by a single view session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreatmentStore {
    treatments: Vec<Treatment>,
}

impl TreatmentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-ordered treatments.
    #[must_use]
    pub fn from_treatments(treatments: Vec<Treatment>) -> Self {
        Self { treatments }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.treatments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.treatments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Treatment> {
        self.treatments.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Treatment] {
        &self.treatments
    }

    #[must_use]
    pub fn get(&self, id: TreatmentId) -> Option<&Treatment> {
        self.treatments.iter().find(|t| t.id() == id)
    }

    /// Id for the next appended treatment: one past the largest id held.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IdsExhausted` if the largest id is `u64::MAX`.
    pub fn next_id(&self) -> Result<TreatmentId, StoreError> {
        match self.treatments.iter().map(Treatment::id).max() {
            None => Ok(TreatmentId::new(1)),
            Some(last) => last.next().ok_or(StoreError::IdsExhausted(last)),
        }
    }

    /// Append a treatment at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IdsExhausted` if no further id can be assigned.
    pub fn append(&mut self, treatment: ValidatedTreatment) -> Result<StoreChange, StoreError> {
        let treatment = treatment.assign_id(self.next_id()?);
        self.treatments.push(treatment.clone());
        Ok(StoreChange::Added(treatment))
    }

    /// Replace the editable fields of an existing treatment in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no treatment has the given id.
    pub fn replace(
        &mut self,
        id: TreatmentId,
        details: ValidatedTreatment,
    ) -> Result<StoreChange, StoreError> {
        let slot = self
            .treatments
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = slot.revise(details);
        Ok(StoreChange::Updated(slot.clone()))
    }

    /// Remove a treatment, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no treatment has the given id.
    pub fn remove(&mut self, id: TreatmentId) -> Result<StoreChange, StoreError> {
        let index = self
            .treatments
            .iter()
            .position(|t| t.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        self.treatments.remove(index);
        Ok(StoreChange::Removed(id))
    }

    /// Rounded mean of every treatment's effective progress on `today`.
    ///
    /// Zero for an empty store.
    #[must_use]
    pub fn overall_progress(&self, today: NaiveDate) -> Progress {
        mean_progress(self.treatments.iter().map(|t| t.progress_on(today)))
    }
}
