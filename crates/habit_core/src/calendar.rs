//! Calendar-date helpers shared by the model, the operations and the stats.
//!
//! Completion and due dates are stored as `YYYY-MM-DD` strings in the
//! user's local calendar. Creation timestamps are RFC 3339 in UTC.

use crate::error::AppError;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset, Weekday};

/// Chart order for weekday breakdowns.
pub const WEEK: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(local_offset())
}

pub fn today() -> Date {
    now_local().date()
}

pub fn parse_date(value: &str) -> Result<Date, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("date is required"));
    }

    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::invalid_input(format!("date must be YYYY-MM-DD, got '{trimmed}'")))
}

pub fn format_date(date: Date) -> Result<String, AppError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Validates a user supplied date and returns its canonical form.
pub fn normalize_date(value: &str) -> Result<String, AppError> {
    format_date(parse_date(value)?)
}

/// Resolves an optional date argument, falling back to `today`.
pub fn date_or_today(value: Option<&str>, today: Date) -> Result<String, AppError> {
    match value {
        Some(value) => normalize_date(value),
        None => format_date(today),
    }
}

pub fn timestamp(now: OffsetDateTime) -> Result<String, AppError> {
    now.to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
        Weekday::Sunday => "Sunday",
    }
}
