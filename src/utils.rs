use crate::error::{InsightError, Result};
use chrono::{Datelike, NaiveDate};

/// Parses a history month label in the format "YYYY-MM" (or a full
/// "YYYY-MM-DD" date) into the first day of that month.
pub fn parse_month(month: &str) -> Result<NaiveDate> {
    let trimmed = month.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date));
    }

    let padded = format!("{}-01", trimmed);
    NaiveDate::parse_from_str(&padded, "%Y-%m-%d")
        .map_err(|_| InsightError::InvalidMonth(month.to_string()))
}

/// Rounds to 2 decimal places, the precision used for all reported
/// scores and monetary amounts.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamps a percentage into [0, 100] before it enters a weighted sum.
pub fn cap_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
