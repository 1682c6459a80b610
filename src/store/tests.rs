use super::*;
use crate::entry::test_support::complete_entry;
use crate::errors::LockError;
use chrono::NaiveDate;
use serde_json::json;
use tempfile::tempdir;

fn memory_store() -> EntryStore<MemoryBackend> {
    EntryStore::in_memory(DayCounter::default())
}

#[test]
fn test_save_then_get_round_trips() {
    let store = memory_store();
    let entry = complete_entry("2024-03-10");

    store.save("2024-03-10", &entry).unwrap();
    assert_eq!(store.get("2024-03-10"), Some(entry));
}

#[test]
fn test_save_rejects_missing_or_malformed_date() {
    let store = memory_store();
    let entry = complete_entry("2024-03-10");

    match store.save("", &entry) {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "Date is required"),
        other => panic!("Expected validation error, got {:?}", other),
    }
    assert!(matches!(
        store.save("10/03/2024", &entry),
        Err(AppError::Validation(_))
    ));
    assert!(store.backend().blob().is_none());
}

#[test]
fn test_save_overwrites_same_date() {
    let store = memory_store();
    let mut first = complete_entry("2024-03-10");
    first.daily_activity_summary = "first".to_string();
    let mut second = complete_entry("2024-03-10");
    second.daily_activity_summary = "second".to_string();

    store.save("2024-03-10", &first).unwrap();
    store.save("2024-03-10", &second).unwrap();

    let all = store.get_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all["2024-03-10"].daily_activity_summary, "second");
}

#[test]
fn test_save_normalizes_entry_date_to_key() {
    let store = memory_store();
    let entry = complete_entry("1999-01-01");

    store.save("2024-03-10", &entry).unwrap();

    let stored = store.get("2024-03-10").unwrap();
    assert_eq!(stored.date, "2024-03-10");
    assert_eq!(stored.weekday, "Sunday");
    assert!(store.get("1999-01-01").is_none());
}

#[test]
fn test_delete_is_idempotent() {
    let store = memory_store();
    store
        .save("2024-03-10", &complete_entry("2024-03-10"))
        .unwrap();

    assert!(store.delete("2024-03-10").unwrap());
    assert!(!store.exists("2024-03-10"));
    assert!(!store.delete("2024-03-10").unwrap());
    assert!(!store.exists("2024-03-10"));
}

#[test]
fn test_delete_many_counts_existing_dates() {
    let store = memory_store();
    for date in ["2024-03-08", "2024-03-09", "2024-03-10"] {
        store.save(date, &complete_entry(date)).unwrap();
    }

    let removed = store
        .delete_many(&[
            "2024-03-08".to_string(),
            "2024-03-10".to_string(),
            "2030-01-01".to_string(),
        ])
        .unwrap();

    assert_eq!(removed, 2);
    let remaining: Vec<String> = store.get_all().into_keys().collect();
    assert_eq!(remaining, vec!["2024-03-09".to_string()]);
}

#[test]
fn test_clear_wipes_everything() {
    let store = memory_store();
    store
        .save("2024-03-10", &complete_entry("2024-03-10"))
        .unwrap();

    store.clear().unwrap();
    assert!(store.get_all().is_empty());
    store.clear().unwrap();
}

#[test]
fn test_get_all_on_uninitialized_store_is_empty() {
    assert!(memory_store().get_all().is_empty());
    assert!(memory_store().get("2024-03-10").is_none());
}

#[test]
fn test_unreadable_blob_reads_empty_but_blocks_writes() {
    let store = EntryStore::new(MemoryBackend::with_blob("{not json"), DayCounter::default());

    assert!(store.get_all().is_empty());
    assert!(!store.exists("2024-03-10"));

    let result = store.save("2024-03-10", &complete_entry("2024-03-10"));
    assert!(matches!(
        result,
        Err(AppError::Persistence(PersistenceError::Corrupt(_)))
    ));
    assert_eq!(store.backend().blob().as_deref(), Some("{not json"));

    // Clearing is the way out and does not need to parse the blob.
    store.clear().unwrap();
    store
        .save("2024-03-10", &complete_entry("2024-03-10"))
        .unwrap();
}

#[test]
fn test_non_object_blob_is_corrupt() {
    let store = EntryStore::new(MemoryBackend::with_blob("[1, 2]"), DayCounter::default());
    match store.delete("2024-03-10") {
        Err(AppError::Persistence(PersistenceError::Corrupt(reason))) => {
            assert!(reason.contains("an array"));
        }
        other => panic!("Expected corrupt store error, got {:?}", other),
    }
}

#[test]
fn test_quota_failure_is_reported_and_store_unchanged() {
    let store = EntryStore::new(MemoryBackend::with_quota(64), DayCounter::default());

    let result = store.save("2024-03-10", &complete_entry("2024-03-10"));
    assert!(matches!(
        result,
        Err(AppError::Persistence(PersistenceError::QuotaExceeded { limit: 64, .. }))
    ));
    assert!(store.get_all().is_empty());
}

#[test]
fn test_foreign_values_survive_writes() {
    let blob = json!({
        "2024-01-01": "not an entry",
        "notes": {"kept": true}
    })
    .to_string();
    let store = EntryStore::new(MemoryBackend::with_blob(blob), DayCounter::default());

    assert!(store.get("2024-01-01").is_none());
    assert!(store.exists("2024-01-01"));

    store
        .save("2024-03-10", &complete_entry("2024-03-10"))
        .unwrap();

    let keys: Vec<String> = store.get_all().into_keys().collect();
    assert_eq!(keys, vec!["2024-03-10".to_string()]);

    let raw: Value = serde_json::from_str(&store.backend().blob().unwrap()).unwrap();
    assert_eq!(raw["2024-01-01"], json!("not an entry"));
    assert_eq!(raw["notes"], json!({"kept": true}));
}

#[test]
fn test_derived_fields_follow_configured_epoch() {
    let blob = json!({
        "2024-01-01": {"date": "2024-01-01", "day_id": 99999, "weekday": "Someday"}
    })
    .to_string();
    let epoch = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    let store = EntryStore::new(MemoryBackend::with_blob(blob), DayCounter::new(epoch));

    let entry = store.get("2024-01-01").unwrap();
    assert_eq!(entry.day_id, 1);
    assert_eq!(entry.weekday, "Monday");
}

#[test]
fn test_save_many_writes_once_and_validates_first() {
    let store = memory_store();
    let batch = vec![
        ("2024-03-09".to_string(), complete_entry("2024-03-09")),
        ("2024-03-10".to_string(), complete_entry("2024-03-10")),
    ];
    assert_eq!(store.save_many(&batch).unwrap(), 2);
    assert_eq!(store.get_all().len(), 2);

    let bad = vec![
        ("2024-03-11".to_string(), complete_entry("2024-03-11")),
        (String::new(), complete_entry("2024-03-12")),
    ];
    assert!(matches!(store.save_many(&bad), Err(AppError::Validation(_))));
    assert!(!store.exists("2024-03-11"));
}

#[test]
fn test_file_store_persists_across_instances() {
    let dir = tempdir().unwrap();
    let entry = complete_entry("2024-03-10");

    EntryStore::open(dir.path(), DayCounter::default())
        .save("2024-03-10", &entry)
        .unwrap();

    let reopened = EntryStore::open(dir.path(), DayCounter::default());
    assert_eq!(reopened.get("2024-03-10"), Some(entry));

    let raw = std::fs::read_to_string(dir.path().join("diary_entries.json")).unwrap();
    assert!(raw.contains("\"2024-03-10\""));
}

#[test]
fn test_file_store_refuses_to_race_a_held_lock() {
    let dir = tempdir().unwrap();
    let store = EntryStore::open(dir.path(), DayCounter::default());

    let other_writer = FileBackend::new(dir.path());
    let guard = other_writer.lock().unwrap();

    let result = store.save("2024-03-10", &complete_entry("2024-03-10"));
    assert!(matches!(
        result,
        Err(AppError::Lock(LockError::StoreBusy { .. }))
    ));

    drop(guard);
    store
        .save("2024-03-10", &complete_entry("2024-03-10"))
        .unwrap();
    assert!(store.exists("2024-03-10"));
}

#[test]
fn test_delete_and_clear_on_fresh_file_store_create_nothing() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("daybook");
    let store = EntryStore::open(&data_dir, DayCounter::default());

    assert!(!store.delete("2024-03-10").unwrap());
    assert_eq!(store.delete_many(&["2024-03-11".to_string()]).unwrap(), 0);
    store.clear().unwrap();
    assert!(!data_dir.exists());
}

#[test]
fn test_entries_with_null_sections_stay_visible() {
    let blob = json!({
        "2024-01-01": {"date": "2024-01-01", "environment": null},
        "2024-01-02": {
            "mental_and_emotional_health": {"mood_timeline": {"morning": null}}
        }
    })
    .to_string();
    let store = EntryStore::new(MemoryBackend::with_blob(blob), DayCounter::default());

    assert!(store.exists("2024-01-01"));
    let first = store.get("2024-01-01").unwrap();
    assert_eq!(first.environment, crate::entry::Environment::default());
    assert_eq!(store.get("2024-01-02").unwrap().morning_mood(), 5);

    let dates: Vec<String> = store.get_all().into_keys().collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);
}
