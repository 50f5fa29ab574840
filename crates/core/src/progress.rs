//! Completion percentages and the arithmetic that produces them.
//!
//! Every percentage in the domain is a [`Progress`], which is guaranteed to lie
//! in `0..=100`. Aggregation and date-based estimation round half away from
//! zero and are done in integer arithmetic so results are exact.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("progress must be between 0 and 100, got {0}")]
    OutOfRange(i64),

    #[error("progress must be a whole number, got {0:?}")]
    NotANumber(String),
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Integer completion percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Self = Self(0);
    pub const COMPLETE: Self = Self(100);

    /// Create a validated percentage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::OutOfRange` if `value` is negative or above 100.
    pub fn new(value: i64) -> Result<Self, ProgressError> {
        match u8::try_from(value) {
            Ok(v) if v <= 100 => Ok(Self(v)),
            _ => Err(ProgressError::OutOfRange(value)),
        }
    }

    /// Parse a percentage typed by a user (surrounding whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NotANumber` for non-integer input and
    /// `ProgressError::OutOfRange` for integers outside `0..=100`.
    pub fn parse(raw: &str) -> Result<Self, ProgressError> {
        let trimmed = raw.trim();
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| ProgressError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    // Clamps to 100.
    fn saturating(value: u64) -> Self {
        Self(u8::try_from(value.min(100)).unwrap_or(100))
    }
}

impl TryFrom<i64> for Progress {
    type Error = ProgressError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Progress> for i64 {
    fn from(value: Progress) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

//
// ─── AGGREGATION ───────────────────────────────────────────────────────────────
//

/// Rounded arithmetic mean of the given percentages.
///
/// Halves round away from zero, so a mean of `60.5` yields `61`.
/// An empty input yields [`Progress::ZERO`].
#[must_use]
pub fn mean_progress<I>(values: I) -> Progress
where
    I: IntoIterator<Item = Progress>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0_u64, 0_u64), |(sum, count), p| {
            (sum + u64::from(p.value()), count + 1)
        });
    if count == 0 {
        return Progress::ZERO;
    }
    Progress::saturating((2 * sum + count) / (2 * count))
}

/// Share of the `start..end` window that has elapsed on `today`.
///
/// Before (or on) the start date this is 0, on or after the end date 100.
#[must_use]
pub fn date_progress(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Progress {
    let elapsed = (today - start).num_days();
    let total = (end - start).num_days();

    if elapsed <= 0 {
        return Progress::ZERO;
    }
    if elapsed >= total {
        return Progress::COMPLETE;
    }

    // 0 < elapsed < total here, so both casts are lossless.
    let elapsed = elapsed.unsigned_abs();
    let total = total.unsigned_abs();
    Progress::saturating((elapsed * 200 + total) / (2 * total))
}

/// Whole days from `today` until `end`; negative once `end` has passed.
#[must_use]
pub fn days_remaining(end: NaiveDate, today: NaiveDate) -> i64 {
    (end - today).num_days()
}
