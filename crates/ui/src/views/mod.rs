mod state;
mod treatment_form;
mod treatments;

#[cfg(test)]
mod intent_smoke;
#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use state::{ViewError, ViewState, view_state_from_resource};
pub use treatment_form::TreatmentFormCard;
pub use treatments::{TreatmentList, TreatmentsView};
