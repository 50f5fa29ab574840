mod ids;
mod treatment;

pub use ids::{ParseIdError, TreatmentId};
pub use treatment::{
    DATE_FORMAT, DEFAULT_FREQUENCY, Treatment, TreatmentDraft, TreatmentError, TreatmentName,
    TreatmentStatus, ValidatedTreatment, parse_optional_date, parse_optional_progress,
};

pub use crate::progress::{Progress, ProgressError};
