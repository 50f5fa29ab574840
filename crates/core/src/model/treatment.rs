use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::ids::TreatmentId;
use crate::progress::{Progress, ProgressError, date_progress, days_remaining};

/// Frequency label used when the user leaves the field blank.
pub const DEFAULT_FREQUENCY: &str = "As needed";

/// Date format accepted from forms and used for storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreatmentError {
    #[error("treatment name cannot be empty")]
    EmptyName,

    #[error("invalid manual progress: {0}")]
    InvalidProgress(#[source] ProgressError),

    #[error("invalid {field} date {raw:?}, expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, raw: String },

    #[error("end date must be after start date")]
    InvalidDateRange,
}

//
// ─── NAME ──────────────────────────────────────────────────────────────────────
//

/// Validated treatment name (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreatmentName(String);

impl TreatmentName {
    /// Create a validated treatment name.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentError::EmptyName` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TreatmentError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TreatmentError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TreatmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Where a treatment stands relative to its end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreatmentStatus {
    Remaining { days: i64 },
    EndsToday,
    Completed { days_ago: i64 },
}

impl TreatmentStatus {
    #[must_use]
    pub fn from_days_remaining(days: i64) -> Self {
        match days {
            d if d < 0 => Self::Completed { days_ago: -d },
            0 => Self::EndsToday,
            d => Self::Remaining { days: d },
        }
    }
}

impl fmt::Display for TreatmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remaining { days } => write!(f, "{days} days remaining"),
            Self::EndsToday => write!(f, "Ends today"),
            Self::Completed { days_ago } => write!(f, "Completed {days_ago} days ago"),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated treatment fields as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreatmentDraft {
    pub name: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
    pub notes: String,
    pub reminders: bool,
    pub caregiver_notifications: bool,
    pub manual_progress: String,
}

impl TreatmentDraft {
    /// Draft carrying only a name; every other field is blank.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validate the draft.
    ///
    /// The name is checked first so callers can tell an empty submission
    /// apart from a malformed one.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentError` for an empty name, an unparsable or
    /// out-of-range manual progress, malformed dates, or an end date that
    /// does not come after the start date.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedTreatment, TreatmentError> {
        let name = TreatmentName::new(self.name)?;
        let manual_progress = parse_optional_progress(&self.manual_progress)?;
        let start_date = parse_optional_date("start", &self.start_date)?;
        let end_date = parse_optional_date("end", &self.end_date)?;
        check_date_range(start_date, end_date)?;

        Ok(ValidatedTreatment {
            name,
            frequency: normalize_frequency(&self.frequency),
            start_date,
            end_date,
            notes: self.notes.trim().to_string(),
            reminders: self.reminders,
            caregiver_notifications: self.caregiver_notifications,
            manual_progress,
            created_at: now,
        })
    }
}

/// Parse an optional `YYYY-MM-DD` date; blank input means "not set".
///
/// # Errors
///
/// Returns `TreatmentError::InvalidDate` if the text is not a valid date.
pub fn parse_optional_date(
    field: &'static str,
    raw: &str,
) -> Result<Option<NaiveDate>, TreatmentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| TreatmentError::InvalidDate {
            field,
            raw: trimmed.to_string(),
        })
}

/// Parse an optional manual progress override; blank input means "not set".
///
/// # Errors
///
/// Returns `TreatmentError::InvalidProgress` for non-numeric or out-of-range text.
pub fn parse_optional_progress(raw: &str) -> Result<Option<Progress>, TreatmentError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    Progress::parse(raw)
        .map(Some)
        .map_err(TreatmentError::InvalidProgress)
}

fn check_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), TreatmentError> {
    match (start, end) {
        (Some(start), Some(end)) if end <= start => Err(TreatmentError::InvalidDateRange),
        _ => Ok(()),
    }
}

fn normalize_frequency(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_FREQUENCY.to_string()
    } else {
        trimmed.to_string()
    }
}

fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

//
// ─── VALIDATED / PERSISTED ─────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTreatment {
    name: TreatmentName,
    frequency: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    notes: String,
    reminders: bool,
    caregiver_notifications: bool,
    manual_progress: Option<Progress>,
    created_at: DateTime<Utc>,
}

impl ValidatedTreatment {
    #[must_use]
    pub fn name(&self) -> &TreatmentName {
        &self.name
    }

    #[must_use]
    pub fn assign_id(self, id: TreatmentId) -> Treatment {
        Treatment {
            id,
            name: self.name,
            frequency: self.frequency,
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes,
            reminders: self.reminders,
            caregiver_notifications: self.caregiver_notifications,
            manual_progress: self.manual_progress,
            created_at: self.created_at,
        }
    }
}

/// A treatment plan tracked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treatment {
    id: TreatmentId,
    name: TreatmentName,
    frequency: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    notes: String,
    reminders: bool,
    caregiver_notifications: bool,
    manual_progress: Option<Progress>,
    created_at: DateTime<Utc>,
}

impl Treatment {
    /// Rehydrate a treatment from storage.
    ///
    /// # Errors
    ///
    /// Returns `TreatmentError` if the persisted name, progress, or dates
    /// violate the same rules drafts are held to.
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    pub fn from_persisted(
        id: TreatmentId,
        name: String,
        frequency: String,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        notes: String,
        reminders: bool,
        caregiver_notifications: bool,
        manual_progress: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TreatmentError> {
        let name = TreatmentName::new(name)?;
        let manual_progress = manual_progress
            .map(Progress::new)
            .transpose()
            .map_err(TreatmentError::InvalidProgress)?;
        check_date_range(start_date, end_date)?;

        Ok(Self {
            id,
            name,
            frequency: normalize_frequency(&frequency),
            start_date,
            end_date,
            notes,
            reminders,
            caregiver_notifications,
            manual_progress,
            created_at,
        })
    }

    /// Replace every editable field, keeping identity and creation time.
    #[must_use]
    pub fn revise(&self, details: ValidatedTreatment) -> Self {
        Self {
            id: self.id,
            created_at: self.created_at,
            ..details.assign_id(self.id)
        }
    }

    /// Form fields that reproduce this treatment when validated.
    #[must_use]
    pub fn to_draft(&self) -> TreatmentDraft {
        TreatmentDraft {
            name: self.name.as_str().to_string(),
            frequency: self.frequency.clone(),
            start_date: format_optional_date(self.start_date),
            end_date: format_optional_date(self.end_date),
            notes: self.notes.clone(),
            reminders: self.reminders,
            caregiver_notifications: self.caregiver_notifications,
            manual_progress: self
                .manual_progress
                .map(|p| p.value().to_string())
                .unwrap_or_default(),
        }
    }

    /// Effective completion on `today`.
    ///
    /// A manual override wins; otherwise progress follows the date window
    /// when both ends are known, and is zero when they are not.
    #[must_use]
    pub fn progress_on(&self, today: NaiveDate) -> Progress {
        if let Some(manual) = self.manual_progress {
            return manual;
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => date_progress(start, end, today),
            _ => Progress::ZERO,
        }
    }

    #[must_use]
    pub fn status_on(&self, today: NaiveDate) -> Option<TreatmentStatus> {
        self.end_date
            .map(|end| TreatmentStatus::from_days_remaining(days_remaining(end, today)))
    }

    #[must_use]
    pub fn id(&self) -> TreatmentId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &TreatmentName {
        &self.name
    }

    #[must_use]
    pub fn frequency(&self) -> &str {
        &self.frequency
    }

    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn reminders(&self) -> bool {
        self.reminders
    }

    #[must_use]
    pub fn caregiver_notifications(&self) -> bool {
        self.caregiver_notifications
    }

    #[must_use]
    pub fn manual_progress(&self) -> Option<Progress> {
        self.manual_progress
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
