//! Day reference parsing and resolution

use crate::error::{DiaryError, Result};
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

/// A user-typed reference to a diary day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayReference {
    /// Offset in days from today (0 = today, -1 = yesterday)
    Relative(i64),
    /// Most recent occurrence of a weekday, today included
    Weekday(Weekday),
    /// Previous occurrence of a weekday (strictly before today)
    LastWeekday(Weekday),
    /// Next occurrence of a weekday (strictly after today)
    NextWeekday(Weekday),
    /// Specific calendar date
    Date(NaiveDate),
}

impl DayReference {
    /// Parse a day reference string
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.split_whitespace().collect::<Vec<_>>().join(" ");
        let normalized = normalized.to_lowercase();
        let invalid = || DiaryError::InvalidDayReference(input.trim().to_string());

        match normalized.as_str() {
            "today" | "now" => return Ok(DayReference::Relative(0)),
            "yesterday" => return Ok(DayReference::Relative(-1)),
            "tomorrow" => return Ok(DayReference::Relative(1)),
            _ => {}
        }

        if let Some(day) = normalized.strip_prefix("last ") {
            return parse_weekday(day)
                .map(DayReference::LastWeekday)
                .ok_or_else(invalid);
        }
        if let Some(day) = normalized.strip_prefix("next ") {
            return parse_weekday(day)
                .map(DayReference::NextWeekday)
                .ok_or_else(invalid);
        }
        if let Some(weekday) = parse_weekday(&normalized) {
            return Ok(DayReference::Weekday(weekday));
        }

        parse_iso_date(&normalized)
            .map(DayReference::Date)
            .map_err(|_| invalid())
    }

    /// Resolve against the given "today"
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match *self {
            DayReference::Relative(days) => today + Duration::days(days),
            DayReference::Weekday(target) => today - Duration::days(days_back(today, target)),
            DayReference::LastWeekday(target) => {
                let back = match days_back(today, target) {
                    0 => 7,
                    n => n,
                };
                today - Duration::days(back)
            }
            DayReference::NextWeekday(target) => {
                let forward = match (7 - days_back(today, target)) % 7 {
                    0 => 7,
                    n => n,
                };
                today + Duration::days(forward)
            }
            DayReference::Date(date) => date,
        }
    }
}

/// Days from the most recent `target` weekday up to `today` (0..=6)
fn days_back(today: NaiveDate, target: Weekday) -> i64 {
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    (current - wanted).rem_euclid(7)
}

/// Full weekday names only
fn parse_weekday(name: &str) -> Option<Weekday> {
    let weekday = match name {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| DiaryError::Config(format!("Invalid date format: '{}'", input.trim())))
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve an optional day argument, defaulting to today
pub fn resolve_day(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(raw) => Ok(DayReference::parse(raw)?.resolve(today())),
        None => Ok(today()),
    }
}
