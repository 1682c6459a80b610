//! JSON import, export and backup of stored entries.
//!
//! Exports are pretty-printed entry documents. Imports accept exactly three
//! document shapes, tried in a fixed order:
//!
//! 1. an array of entries, each carrying its own `date`;
//! 2. one entry object carrying both `date` and `version`;
//! 3. an object whose `YYYY-MM-DD` keys map to entries.
//!
//! The first match wins. Nothing beyond these shapes is guessed at.

use crate::constants::{BACKUP_FILE_PREFIX, EXPORT_FILE_EXTENSION, MULTI_EXPORT_FILE_PREFIX};
use crate::entry::days::{is_date_key, parse_entry_date};
use crate::entry::Entry;
use crate::errors::{AppError, AppResult};
use crate::store::{EntryStore, StorageBackend};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, warn};

/// Which of the accepted import shapes a document had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportShape {
    DatedSequence,
    SingleEntry,
    DateKeyedMap,
}

impl fmt::Display for ImportShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImportShape::DatedSequence => "list of entries",
            ImportShape::SingleEntry => "single entry",
            ImportShape::DateKeyedMap => "date-keyed map",
        })
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Entries written to the store.
    pub count: usize,
    /// Candidates that looked like entries but could not be stored.
    pub skipped: usize,
    pub shape: ImportShape,
}

/// A parsed import document, classified into one of the accepted shapes.
enum ImportDocument {
    DatedSequence(Vec<Value>),
    SingleEntry(Map<String, Value>),
    DateKeyedMap(Map<String, Value>),
}

impl ImportDocument {
    fn classify(value: Value) -> AppResult<Self> {
        match value {
            Value::Array(items) => Ok(ImportDocument::DatedSequence(items)),
            Value::Object(map) if is_truthy(map.get("date")) && is_truthy(map.get("version")) => {
                Ok(ImportDocument::SingleEntry(map))
            }
            Value::Object(map) => Ok(ImportDocument::DateKeyedMap(map)),
            other => Err(AppError::Format(format!(
                "expected a list of entries, a single entry or a date-keyed map, found {}",
                describe(&other)
            ))),
        }
    }

    fn shape(&self) -> ImportShape {
        match self {
            ImportDocument::DatedSequence(_) => ImportShape::DatedSequence,
            ImportDocument::SingleEntry(_) => ImportShape::SingleEntry,
            ImportDocument::DateKeyedMap(_) => ImportShape::DateKeyedMap,
        }
    }

    /// `(date, document)` pairs worth trying to store.
    fn candidates(self) -> Vec<(Value, Value)> {
        match self {
            ImportDocument::DatedSequence(items) => items
                .into_iter()
                .filter_map(|item| {
                    let date = item.get("date").filter(|d| is_truthy(Some(*d)))?.clone();
                    Some((date, item))
                })
                .collect(),
            ImportDocument::SingleEntry(map) => {
                let date = map.get("date").cloned().unwrap_or(Value::Null);
                vec![(date, Value::Object(map))]
            }
            ImportDocument::DateKeyedMap(map) => map
                .into_iter()
                .filter(|(key, _)| is_date_key(key))
                .map(|(key, item)| (Value::String(key), item))
                .collect(),
        }
    }
}

/// JavaScript-style truthiness, the test the file format has always used
/// for "has a date" and "has a version".
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Format(e.to_string()))
}

/// Pretty-printed JSON of the entry stored under `date`, or `None` if there is none.
pub fn export_entry<B: StorageBackend>(store: &EntryStore<B>, date: &str) -> Option<String> {
    let entry = store.get(date)?;
    match to_pretty_json(&entry) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("Could not serialize entry for {}: {}", date, e);
            None
        }
    }
}

/// Pretty-printed JSON array of the selected entries, in the order given.
///
/// Dates with no stored entry are left out.
pub fn export_entries<B: StorageBackend>(
    store: &EntryStore<B>,
    dates: &[String],
) -> AppResult<String> {
    let all = store.get_all();
    let selected: Vec<&Entry> = dates.iter().filter_map(|date| all.get(date)).collect();
    debug!("Exporting {} of {} selected entries", selected.len(), dates.len());
    to_pretty_json(&selected)
}

/// Pretty-printed JSON array of every stored entry, oldest first.
///
/// The array holds entry values only; each entry's own `date` identifies it.
pub fn create_backup<B: StorageBackend>(store: &EntryStore<B>) -> AppResult<String> {
    let entries: Vec<Entry> = store.get_all().into_values().collect();
    info!("Backing up {} entries", entries.len());
    to_pretty_json(&entries)
}

/// Imports entries from raw JSON text.
///
/// Accepted entries are written to the store in a single write. Candidates
/// whose date is invalid or whose value is not an entry object are skipped
/// and counted. Array elements without a date and map keys that are not
/// dates are ignored. Zero imported entries is still a success.
///
/// # Errors
///
/// - `AppError::Parse` if `raw` is not valid JSON.
/// - `AppError::Format` if the JSON is not an array or object.
/// - Any store error from the final write.
///
/// # Examples
///
/// ```
/// use daybook::codec::{import_entries, ImportShape};
/// use daybook::entry::DayCounter;
/// use daybook::store::EntryStore;
///
/// let store = EntryStore::in_memory(DayCounter::default());
/// let report = import_entries(&store, r#"[{"date": "2024-01-01"}, {"no_date": true}]"#).unwrap();
///
/// assert_eq!(report.count, 1);
/// assert_eq!(report.shape, ImportShape::DatedSequence);
/// assert!(store.exists("2024-01-01"));
/// ```
pub fn import_entries<B: StorageBackend>(
    store: &EntryStore<B>,
    raw: &str,
) -> AppResult<ImportReport> {
    let value: Value = serde_json::from_str(raw).map_err(|e| AppError::Parse(e.to_string()))?;
    let document = ImportDocument::classify(value)?;
    let shape = document.shape();
    debug!("Import document recognized as {}", shape);

    let mut accepted = Vec::new();
    let mut skipped = 0;
    for (date, item) in document.candidates() {
        match decode_candidate(&date, item) {
            Ok(pair) => accepted.push(pair),
            Err(reason) => {
                warn!("Skipping imported element: {}", reason);
                skipped += 1;
            }
        }
    }

    let count = store.save_many(&accepted)?;
    info!(
        "Imported {} entries from {} ({} skipped)",
        count, shape, skipped
    );
    Ok(ImportReport {
        count,
        skipped,
        shape,
    })
}

fn decode_candidate(date: &Value, item: Value) -> Result<(String, Entry), String> {
    let Value::String(date) = date else {
        return Err(format!("date {} is not a string", date));
    };
    parse_entry_date(date).map_err(|e| e.to_string())?;
    if !item.is_object() {
        return Err(format!("value for {} is {}, not an entry", date, describe(&item)));
    }
    let entry: Entry =
        serde_json::from_value(item).map_err(|e| format!("entry for {}: {}", date, e))?;
    Ok((date.clone(), entry))
}

/// File name of a single-entry export: `{date}.json`.
pub fn entry_file_name(date: &str) -> String {
    format!("{}{}", date, EXPORT_FILE_EXTENSION)
}

/// File name of a multi-entry export: `diary_export_{count}.json`.
pub fn multi_export_file_name(count: usize) -> String {
    format!("{}{}{}", MULTI_EXPORT_FILE_PREFIX, count, EXPORT_FILE_EXTENSION)
}

/// File name of a bulk backup taken at `now`, e.g.
/// `diary-backup-2024-03-10T14-05-09-123Z.json`.
pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!(
        "{}{}{}",
        BACKUP_FILE_PREFIX,
        now.format("%Y-%m-%dT%H-%M-%S-%3fZ"),
        EXPORT_FILE_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::test_support::complete_entry;
    use crate::entry::DayCounter;
    use crate::store::MemoryBackend;
    use chrono::TimeZone;
    use serde_json::json;

    fn memory_store() -> EntryStore<MemoryBackend> {
        EntryStore::in_memory(DayCounter::default())
    }

    #[test]
    fn test_sequence_skips_undated_elements() {
        let store = memory_store();
        let raw = json!([
            {"date": "2024-01-01", "daily_activity_summary": "walked"},
            {"no_date": true}
        ])
        .to_string();

        let report = import_entries(&store, &raw).unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.shape, ImportShape::DatedSequence);

        let all = store.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all["2024-01-01"].daily_activity_summary, "walked");
    }

    #[test]
    fn test_single_entry_needs_date_and_version() {
        let store = memory_store();
        let raw = json!({"date": "2024-01-01", "version": "4.0", "overall_day_experience": "ok"})
            .to_string();

        let report = import_entries(&store, &raw).unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(report.shape, ImportShape::SingleEntry);
        assert_eq!(store.get("2024-01-01").unwrap().version, "4.0");
    }

    #[test]
    fn test_object_with_date_but_no_version_is_a_map() {
        let store = memory_store();
        let raw = json!({"date": "2024-01-01", "weekday": "Monday"}).to_string();

        let report = import_entries(&store, &raw).unwrap();
        assert_eq!(report.shape, ImportShape::DateKeyedMap);
        assert_eq!(report.count, 0);
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_map_keeps_only_date_shaped_keys() {
        let store = memory_store();
        let raw = json!({
            "2024-01-01": {"daily_activity_summary": "kept"},
            "not-a-date": {"daily_activity_summary": "dropped"}
        })
        .to_string();

        let report = import_entries(&store, &raw).unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.shape, ImportShape::DateKeyedMap);
        assert!(store.exists("2024-01-01"));
        assert!(!store.exists("not-a-date"));
        assert_eq!(store.get("2024-01-01").unwrap().date, "2024-01-01");
    }

    #[test]
    fn test_invalid_candidates_are_counted_as_skipped() {
        let store = memory_store();
        let raw = json!([
            {"date": "2024-02-30"},
            {"date": 20240101},
            {"date": "2024-01-02"}
        ])
        .to_string();

        let report = import_entries(&store, &raw).unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(report.skipped, 2);

        let raw = json!({"2024-01-01": "text", "2024-01-02": {}}).to_string();
        let report = import_entries(&store, &raw).unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_null_or_scalar_sections_still_import() {
        let store = memory_store();
        let raw = json!([
            {"date": "2024-01-01", "environment": null},
            {
                "date": "2024-01-02",
                "mental_and_emotional_health": {"mood_timeline": {"morning": null}}
            },
            {"date": "2024-01-03", "body_measurements": "n/a"}
        ])
        .to_string();

        let report = import_entries(&store, &raw).unwrap();
        assert_eq!(report.count, 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(store.get("2024-01-02").unwrap().morning_mood(), 5);
        assert_eq!(store.get_all().len(), 3);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error_and_stores_nothing() {
        let store = memory_store();
        match import_entries(&store, "{\"2024-01-01\": ") {
            Err(AppError::Parse(msg)) => assert!(!msg.is_empty()),
            other => panic!("Expected parse error, got {:?}", other),
        }
        assert!(store.backend().blob().is_none());
    }

    #[test]
    fn test_scalar_json_is_a_format_error() {
        let store = memory_store();
        for raw in ["42", "\"text\"", "null", "true"] {
            assert!(
                matches!(import_entries(&store, raw), Err(AppError::Format(_))),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_empty_sequence_imports_nothing_successfully() {
        let store = memory_store();
        let report = import_entries(&store, "[]").unwrap();
        assert_eq!(report.count, 0);
        assert!(store.backend().blob().is_none());
    }

    #[test]
    fn test_export_entry() {
        let store = memory_store();
        assert!(export_entry(&store, "2024-03-10").is_none());

        let entry = complete_entry("2024-03-10");
        store.save("2024-03-10", &entry).unwrap();

        let json = export_entry(&store, "2024-03-10").unwrap();
        assert!(json.contains("\n  \"version\": \"4.0\""));
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_backup_reimports_as_sequence() {
        let source = memory_store();
        for date in ["2024-03-08", "2024-03-09", "2024-03-10"] {
            source.save(date, &complete_entry(date)).unwrap();
        }
        let backup = create_backup(&source).unwrap();
        let parsed: Value = serde_json::from_str(&backup).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(3));

        let target = memory_store();
        let report = import_entries(&target, &backup).unwrap();
        assert_eq!(report.shape, ImportShape::DatedSequence);
        assert_eq!(report.count, 3);
        assert_eq!(target.get_all(), source.get_all());
    }

    #[test]
    fn test_export_entries_skips_missing_dates() {
        let store = memory_store();
        store
            .save("2024-03-10", &complete_entry("2024-03-10"))
            .unwrap();

        let json = export_entries(
            &store,
            &["2024-03-10".to_string(), "2024-03-11".to_string()],
        )
        .unwrap();
        let parsed: Vec<Entry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].date, "2024-03-10");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(entry_file_name("2024-03-10"), "2024-03-10.json");
        assert_eq!(multi_export_file_name(3), "diary_export_3.json");

        let now = Utc.with_ymd_and_hms(2024, 3, 10, 14, 5, 9).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(
            backup_file_name(now),
            "diary-backup-2024-03-10T14-05-09-123Z.json"
        );
    }
}
