use chrono::NaiveDate;

/// Label for a missing date.
pub const DATE_NOT_SET: &str = "Not set";

/// Short human date, e.g. `Oct 16, 2026`.
#[must_use]
pub fn format_date(value: Option<NaiveDate>) -> String {
    value.map_or_else(
        || DATE_NOT_SET.to_string(),
        |date| date.format("%b %-d, %Y").to_string(),
    )
}

#[must_use]
pub fn format_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    format!("{} → {}", format_date(start), format_date(end))
}
