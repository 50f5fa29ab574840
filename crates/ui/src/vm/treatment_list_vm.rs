use chrono::NaiveDate;
use treatment_core::model::{Progress, Treatment, TreatmentId};
use treatment_core::store::TreatmentStore;

use crate::vm::time_fmt::format_date_range;

pub const EMPTY_SUMMARY: &str = "No active treatments yet!";

/// One rendered treatment row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreatmentRowVm {
    pub id: TreatmentId,
    pub name: String,
    pub progress: u8,
    pub progress_label: String,
    /// Inline style for the bar fill, proportional to `progress`.
    pub fill_style: String,
    pub frequency: String,
    pub status: Option<String>,
    pub dates_label: String,
}

impl TreatmentRowVm {
    #[must_use]
    pub fn from_treatment(treatment: &Treatment, today: NaiveDate) -> Self {
        let progress = treatment.progress_on(today);
        Self {
            id: treatment.id(),
            name: treatment.name().to_string(),
            progress: progress.value(),
            progress_label: progress.to_string(),
            fill_style: fill_style(progress),
            frequency: treatment.frequency().to_owned(),
            status: treatment.status_on(today).map(|s| s.to_string()),
            dates_label: format_date_range(treatment.start_date(), treatment.end_date()),
        }
    }
}

/// Everything the treatment list shows for one store snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreatmentListVm {
    pub rows: Vec<TreatmentRowVm>,
    /// `None` when there is nothing to aggregate.
    pub overall: Option<Progress>,
    pub summary: String,
}

impl TreatmentListVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render the store as rows plus the overall summary line.
///
/// Pure: the same store and day always produce an equal view model.
#[must_use]
pub fn render_treatments(store: &TreatmentStore, today: NaiveDate) -> TreatmentListVm {
    let rows = store
        .iter()
        .map(|t| TreatmentRowVm::from_treatment(t, today))
        .collect();
    let overall = (!store.is_empty()).then(|| store.overall_progress(today));

    TreatmentListVm {
        rows,
        overall,
        summary: summary_text(overall),
    }
}

#[must_use]
pub fn summary_text(overall: Option<Progress>) -> String {
    match overall {
        Some(progress) => format!("Your current treatment is {progress} complete overall!"),
        None => EMPTY_SUMMARY.to_string(),
    }
}

#[must_use]
pub fn fill_style(progress: Progress) -> String {
    format!("width: {}%", progress.value())
}
