//! Filtered, sorted views over the stored entries.
//!
//! Everything here is a pure function of a store snapshot (the map returned
//! by [`EntryStore::get_all`](crate::store::EntryStore::get_all)) and its
//! inputs. There is no index or cache; a personal diary holds at most a few
//! thousand entries.

use crate::constants::{
    DATE_FORMAT_ISO, EMPTY_SUMMARY_PREVIEW, HAPPY_MOOD_THRESHOLD, PREVIEW_CHARS, WEEK_FILTER_DAYS,
};
use crate::entry::Entry;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Snapshot of the store: date key to entry.
pub type Snapshot = BTreeMap<String, Entry>;

/// Which entries a history listing keeps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    /// Morning mood level of 7 or more.
    Happy,
    /// Dated within 7 calendar days of today, either side.
    Week,
    /// Has a non-empty daily summary.
    Complete,
    /// Any other filter name. Matches nothing.
    Unrecognized(String),
}

impl FromStr for HistoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => HistoryFilter::All,
            "happy" => HistoryFilter::Happy,
            "week" => HistoryFilter::Week,
            "complete" => HistoryFilter::Complete,
            other => HistoryFilter::Unrecognized(other.to_string()),
        })
    }
}

impl fmt::Display for HistoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryFilter::All => f.write_str("all"),
            HistoryFilter::Happy => f.write_str("happy"),
            HistoryFilter::Week => f.write_str("week"),
            HistoryFilter::Complete => f.write_str("complete"),
            HistoryFilter::Unrecognized(name) => f.write_str(name),
        }
    }
}

impl HistoryFilter {
    fn matches(&self, date: &str, entry: &Entry, today: NaiveDate) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Happy => entry.morning_mood() >= HAPPY_MOOD_THRESHOLD,
            HistoryFilter::Week => NaiveDate::parse_from_str(date, DATE_FORMAT_ISO)
                .map(|d| (today - d).num_days().abs() <= WEEK_FILTER_DAYS)
                .unwrap_or(false),
            HistoryFilter::Complete => entry.has_summary(),
            HistoryFilter::Unrecognized(_) => false,
        }
    }
}

/// Case-insensitive substring match against the entry's full JSON text.
fn matches_search(entry: &Entry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    serde_json::to_string(entry)
        .map(|json| json.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Entries matching `search` and `filter`, most recent date first.
///
/// `today` anchors the `week` filter.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use daybook::entry::{DayCounter, Entry};
/// use daybook::history::{list, HistoryFilter, Snapshot};
///
/// let counter = DayCounter::default();
/// let mut snapshot = Snapshot::new();
/// for day in [1, 2, 3] {
///     let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
///     let entry = Entry::draft(date, &counter);
///     snapshot.insert(entry.date.clone(), entry);
/// }
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// let dates: Vec<String> = list(&snapshot, "", &HistoryFilter::All, today)
///     .into_iter()
///     .map(|(date, _)| date)
///     .collect();
/// assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
/// ```
pub fn list(
    snapshot: &Snapshot,
    search: &str,
    filter: &HistoryFilter,
    today: NaiveDate,
) -> Vec<(String, Entry)> {
    let needle = search.trim().to_lowercase();
    let matched: Vec<(String, Entry)> = snapshot
        .iter()
        .rev()
        .filter(|(date, entry)| filter.matches(date, entry, today))
        .filter(|(_, entry)| matches_search(entry, &needle))
        .map(|(date, entry)| (date.clone(), entry.clone()))
        .collect();
    debug!(
        "History: {} of {} entries match filter={} search={:?}",
        matched.len(),
        snapshot.len(),
        filter,
        search
    );
    matched
}

/// One line of the history listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub date: String,
    /// Morning mood level.
    pub mood_level: u8,
    pub preview: String,
    /// Strict completeness, not the looser `complete` filter.
    pub complete: bool,
}

impl HistoryRow {
    pub fn new(date: &str, entry: &Entry) -> Self {
        HistoryRow {
            date: date.to_string(),
            mood_level: entry.morning_mood(),
            preview: preview(&entry.daily_activity_summary),
            complete: entry.is_complete(),
        }
    }
}

/// Rows for a listing produced by [`list`].
pub fn rows(listing: &[(String, Entry)]) -> Vec<HistoryRow> {
    listing
        .iter()
        .map(|(date, entry)| HistoryRow::new(date, entry))
        .collect()
}

fn preview(summary: &str) -> String {
    if summary.is_empty() {
        return EMPTY_SUMMARY_PREVIEW.to_string();
    }
    let mut chars = summary.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Weather conditions used before, sorted and de-duplicated.
pub fn weather_suggestions(snapshot: &Snapshot) -> Vec<String> {
    distinct(snapshot.values().map(|e| &e.environment.weather_condition))
}

/// App names used before, sorted and de-duplicated.
pub fn app_name_suggestions(snapshot: &Snapshot) -> Vec<String> {
    distinct(
        snapshot
            .values()
            .flat_map(|e| e.activities_and_productivity.most_used_apps.iter())
            .map(|app| &app.name),
    )
}

/// Personal care values used before, one list per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalCareSuggestions {
    pub face_product_names: Vec<String>,
    pub face_product_brands: Vec<String>,
    pub hair_product_names: Vec<String>,
    pub hair_product_brands: Vec<String>,
    pub hair_oils: Vec<String>,
}

pub fn personal_care_suggestions(snapshot: &Snapshot) -> PersonalCareSuggestions {
    let care = || snapshot.values().map(|e| &e.personal_care);
    PersonalCareSuggestions {
        face_product_names: distinct(care().map(|c| &c.face_product_name)),
        face_product_brands: distinct(care().map(|c| &c.face_product_brand)),
        hair_product_names: distinct(care().map(|c| &c.hair_product_name)),
        hair_product_brands: distinct(care().map(|c| &c.hair_product_brand)),
        hair_oils: distinct(care().map(|c| &c.hair_oil)),
    }
}
