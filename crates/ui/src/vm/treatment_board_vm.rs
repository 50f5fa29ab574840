use chrono::{DateTime, NaiveDate, Utc};
use treatment_core::model::TreatmentId;
use treatment_core::store::{StoreChange, StoreError, TreatmentStore};

use crate::vm::treatment_form_vm::{
    FormIntent, FormMode, FormOutcome, FormState, FormSubmission, TreatmentFormVm,
};
use crate::vm::treatment_list_vm::{TreatmentListVm, render_treatments};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardIntent {
    Form(FormIntent),
    Edit(TreatmentId),
    Delete(TreatmentId),
}

/// One view session: the treatment store plus the add/edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreatmentBoardVm {
    store: TreatmentStore,
    form: TreatmentFormVm,
}

impl TreatmentBoardVm {
    #[must_use]
    pub fn new(store: TreatmentStore) -> Self {
        Self {
            store,
            form: TreatmentFormVm::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &TreatmentStore {
        &self.store
    }

    #[must_use]
    pub fn form(&self) -> &TreatmentFormVm {
        &self.form
    }

    #[must_use]
    pub fn render(&self, today: NaiveDate) -> TreatmentListVm {
        render_treatments(&self.store, today)
    }

    /// Apply one intent and return the store mutation it caused, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when editing, updating or deleting a
    /// treatment that is no longer in the store, and `StoreError::IdsExhausted`
    /// when no id is left for a new treatment.
    pub fn dispatch(
        &mut self,
        intent: BoardIntent,
        now: DateTime<Utc>,
    ) -> Result<Option<StoreChange>, StoreError> {
        match intent {
            BoardIntent::Form(intent) => match self.form.dispatch(intent, now) {
                FormOutcome::Submitted(FormSubmission::Create(validated)) => {
                    self.store.append(validated).map(Some)
                }
                FormOutcome::Submitted(FormSubmission::Update(id, validated)) => {
                    self.store.replace(id, validated).map(Some)
                }
                _ => Ok(None),
            },
            BoardIntent::Edit(id) => {
                let treatment = self.store.get(id).ok_or(StoreError::NotFound(id))?;
                self.form.begin_edit(id, treatment.to_draft());
                Ok(None)
            }
            BoardIntent::Delete(id) => {
                let change = self.store.remove(id)?;
                if self.form.state() == FormState::Open(FormMode::Edit(id)) {
                    self.form.dispatch(FormIntent::Cancel, now);
                }
                Ok(Some(change))
            }
        }
    }
}
