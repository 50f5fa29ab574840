use chrono::{DateTime, NaiveDate, Utc};
use treatment_core::model::{
    Progress, TreatmentDraft, TreatmentError, TreatmentId, TreatmentStatus, ValidatedTreatment,
    parse_optional_date,
};
use treatment_core::progress::{date_progress, days_remaining};

use crate::vm::treatment_list_vm::fill_style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(TreatmentId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Collapsed,
    Open(FormMode),
}

/// A single edit to one form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldInput {
    Name(String),
    Frequency(String),
    StartDate(String),
    EndDate(String),
    Notes(String),
    Reminders(bool),
    CaregiverNotifications(bool),
    ManualProgress(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormIntent {
    Open,
    Input(FieldInput),
    Cancel,
    Save,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormSubmission {
    Create(ValidatedTreatment),
    Update(TreatmentId, ValidatedTreatment),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormOutcome {
    /// The intent does not apply in the current state.
    Ignored,
    Opened,
    FieldChanged,
    Cancelled,
    /// Saved with an empty name: nothing is created and the form closes.
    Discarded,
    Submitted(FormSubmission),
    /// Saved with invalid fields; the form stays open showing the error.
    Rejected(TreatmentError),
}

/// Progress the form would produce, shown while typing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressPreviewVm {
    pub progress_label: String,
    pub fill_style: String,
    pub hint: String,
}

/// Add/edit treatment form as an explicit state machine.
///
/// Leaving the open state by any path clears every field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreatmentFormVm {
    state: FormState,
    fields: TreatmentDraft,
    error: Option<TreatmentError>,
}

impl TreatmentFormVm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::Open(_))
    }

    #[must_use]
    pub fn fields(&self) -> &TreatmentDraft {
        &self.fields
    }

    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.state {
            FormState::Open(FormMode::Edit(_)) => "Edit Treatment Plan",
            FormState::Collapsed | FormState::Open(FormMode::Add) => "Add Treatment Plan",
        }
    }

    /// Open the form prefilled with an existing treatment.
    pub fn begin_edit(&mut self, id: TreatmentId, fields: TreatmentDraft) {
        self.state = FormState::Open(FormMode::Edit(id));
        self.fields = fields;
        self.error = None;
    }

    pub fn dispatch(&mut self, intent: FormIntent, now: DateTime<Utc>) -> FormOutcome {
        match (self.state, intent) {
            (FormState::Collapsed, FormIntent::Open) => {
                self.state = FormState::Open(FormMode::Add);
                FormOutcome::Opened
            }
            (FormState::Open(_), FormIntent::Input(input)) => {
                self.apply_input(input);
                self.error = None;
                FormOutcome::FieldChanged
            }
            (FormState::Open(_), FormIntent::Cancel) => {
                self.collapse();
                FormOutcome::Cancelled
            }
            (FormState::Open(mode), FormIntent::Save) => self.save(mode, now),
            (FormState::Collapsed, _) | (FormState::Open(_), FormIntent::Open) => {
                FormOutcome::Ignored
            }
        }
    }

    /// Preview of the progress the current fields would produce on `today`.
    #[must_use]
    pub fn preview(&self, today: NaiveDate) -> ProgressPreviewVm {
        preview_progress(&self.fields, today)
    }

    fn save(&mut self, mode: FormMode, now: DateTime<Utc>) -> FormOutcome {
        match self.fields.clone().validate(now) {
            Ok(validated) => {
                self.collapse();
                FormOutcome::Submitted(match mode {
                    FormMode::Add => FormSubmission::Create(validated),
                    FormMode::Edit(id) => FormSubmission::Update(id, validated),
                })
            }
            Err(TreatmentError::EmptyName) => {
                self.collapse();
                FormOutcome::Discarded
            }
            Err(err) => {
                self.error = Some(err.clone());
                FormOutcome::Rejected(err)
            }
        }
    }

    fn collapse(&mut self) {
        self.state = FormState::Collapsed;
        self.fields = TreatmentDraft::default();
        self.error = None;
    }

    fn apply_input(&mut self, input: FieldInput) {
        let fields = &mut self.fields;
        match input {
            FieldInput::Name(v) => fields.name = v,
            FieldInput::Frequency(v) => fields.frequency = v,
            FieldInput::StartDate(v) => fields.start_date = v,
            FieldInput::EndDate(v) => fields.end_date = v,
            FieldInput::Notes(v) => fields.notes = v,
            FieldInput::Reminders(v) => fields.reminders = v,
            FieldInput::CaregiverNotifications(v) => fields.caregiver_notifications = v,
            FieldInput::ManualProgress(v) => fields.manual_progress = v,
        }
    }
}

/// Progress and hint for partially filled form fields.
///
/// Never fails: fields that cannot be interpreted yet fall back to 0%.
#[must_use]
pub fn preview_progress(fields: &TreatmentDraft, today: NaiveDate) -> ProgressPreviewVm {
    let (progress, hint) = if fields.manual_progress.trim().is_empty() {
        date_preview(fields, today)
    } else {
        match Progress::parse(&fields.manual_progress) {
            Ok(p) => (p, "Using manual override".to_string()),
            Err(_) => (
                Progress::ZERO,
                "Enter a whole number between 0 and 100".to_string(),
            ),
        }
    };

    ProgressPreviewVm {
        progress_label: progress.to_string(),
        fill_style: fill_style(progress),
        hint,
    }
}

fn date_preview(fields: &TreatmentDraft, today: NaiveDate) -> (Progress, String) {
    let start = parse_optional_date("start", &fields.start_date).ok().flatten();
    let end = parse_optional_date("end", &fields.end_date).ok().flatten();
    match (start, end) {
        (Some(start), Some(end)) if end > start => {
            let hint = match TreatmentStatus::from_days_remaining(days_remaining(end, today)) {
                TreatmentStatus::Completed { days_ago } => {
                    format!("Treatment completed {days_ago} days ago")
                }
                TreatmentStatus::EndsToday => "Treatment ends today".to_string(),
                remaining @ TreatmentStatus::Remaining { .. } => remaining.to_string(),
            };
            (date_progress(start, end, today), hint)
        }
        (Some(_), Some(_)) => (
            Progress::ZERO,
            "End date must be after start date".to_string(),
        ),
        _ => (
            Progress::ZERO,
            "Set start and end dates to auto-calculate progress".to_string(),
        ),
    }
}
