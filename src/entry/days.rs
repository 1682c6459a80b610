//! Date keys and the display fields derived from them.

use crate::constants::{DATE_FORMAT_COMPACT, DATE_FORMAT_ISO, DEFAULT_EPOCH};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date key pattern is valid"));

/// Returns true if `key` has the `YYYY-MM-DD` shape used for store keys.
///
/// Only the shape is checked; `2024-13-45` is date-like but not a real date.
pub fn is_date_key(key: &str) -> bool {
    DATE_KEY_RE.is_match(key)
}

/// Validates a store key and parses it into a calendar date.
///
/// # Errors
///
/// Returns `AppError::Validation` if the key is empty, is not in `YYYY-MM-DD`
/// form, or names a day that does not exist.
///
/// # Examples
///
/// ```
/// use daybook::entry::days::parse_entry_date;
///
/// assert!(parse_entry_date("2024-02-29").is_ok());
/// assert!(parse_entry_date("").is_err());
/// assert!(parse_entry_date("2023-02-29").is_err());
/// ```
pub fn parse_entry_date(key: &str) -> AppResult<NaiveDate> {
    if key.is_empty() {
        return Err(AppError::Validation("Date is required".to_string()));
    }
    if !is_date_key(key) {
        return Err(AppError::Validation(format!(
            "Invalid date '{}': expected YYYY-MM-DD",
            key
        )));
    }
    NaiveDate::parse_from_str(key, DATE_FORMAT_ISO)
        .map_err(|e| AppError::Validation(format!("Invalid date '{}': {}", key, e)))
}

/// Parses a date typed on the command line, in `YYYY-MM-DD` or `YYYYMMDD` form.
pub fn parse_user_date(input: &str) -> AppResult<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(input, DATE_FORMAT_COMPACT))
        .map_err(|_| {
            AppError::Validation(format!(
                "Invalid date '{}': expected YYYY-MM-DD or YYYYMMDD",
                input
            ))
        })
}

/// Formats a date as a store key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT_ISO).to_string()
}

/// Computes the derived display fields of an entry from its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCounter {
    epoch: NaiveDate,
}

impl DayCounter {
    pub fn new(epoch: NaiveDate) -> Self {
        DayCounter { epoch }
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    /// Whole days between the reference date and `date`. Negative before it.
    pub fn day_id(&self, date: NaiveDate) -> i64 {
        (date - self.epoch).num_days()
    }

    /// English weekday name, e.g. `Monday`.
    pub fn weekday(&self, date: NaiveDate) -> String {
        date.format("%A").to_string()
    }
}

impl Default for DayCounter {
    fn default() -> Self {
        let epoch = NaiveDate::parse_from_str(DEFAULT_EPOCH, DATE_FORMAT_ISO)
            .unwrap_or(NaiveDate::MIN);
        DayCounter { epoch }
    }
}
