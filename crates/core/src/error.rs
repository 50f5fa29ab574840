use thiserror::Error;

use crate::model::TreatmentError;
use crate::progress::ProgressError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Treatment(#[from] TreatmentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
