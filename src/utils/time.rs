//! Time utilities: timestamp parsing, duration formatting.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a user-supplied timestamp in one of the accepted formats.
/// A bare date means midnight; a bare time means today.
pub fn parse_datetime(s: &str) -> AppResult<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d.%m.%Y %H:%M:%S",
        "%d.%m.%Y %H:%M",
    ];

    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d.%m.%Y") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return Ok(Local::now().date_naive().and_time(t));
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        return Ok(Local::now().date_naive().and_time(t));
    }

    Err(AppError::InvalidInput(format!(
        "could not parse timestamp '{}'",
        s
    )))
}

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .map_err(|_| AppError::InvalidInput(format!("could not parse date '{}'", s)))
}

/// Format a duration as HH:MM:SS (hours may exceed 24).
pub fn format_hms(d: Duration) -> String {
    let total = d.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
