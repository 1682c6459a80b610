use chrono::NaiveDate;
use daybook::codec::{create_backup, export_entries, import_entries, ImportShape};
use daybook::entry::{DayCounter, Entry};
use daybook::errors::{AppError, LockError};
use daybook::history::{self, HistoryFilter};
use daybook::session::{DraftSession, Section};
use daybook::store::{EntryStore, FileBackend, StorageBackend};
use serde_json::{json, Value};
use std::fs;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_session_autosave_reaches_disk() {
    let dir = tempdir().unwrap();
    let store = EntryStore::open(dir.path(), DayCounter::default());
    let start = Instant::now();

    let mut session = DraftSession::open(&store, day(2024, 3, 10));
    session.modify(
        |entry| entry.daily_activity_summary = "Planted tomatoes".to_string(),
        start,
    );
    assert!(session
        .flush_if_due(&store, start + Duration::from_millis(600))
        .unwrap());

    let reopened = EntryStore::open(dir.path(), DayCounter::default());
    assert_eq!(
        reopened.get("2024-03-10").unwrap().daily_activity_summary,
        "Planted tomatoes"
    );
}

#[test]
fn test_store_file_is_a_date_keyed_object() {
    let dir = tempdir().unwrap();
    let store = EntryStore::open(dir.path(), DayCounter::default());
    let mut session = DraftSession::open(&store, day(2024, 3, 10));
    session.save(&store).unwrap();

    let raw: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("diary_entries.json")).unwrap())
            .unwrap();
    let object = raw.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(raw["2024-03-10"]["date"], "2024-03-10");
    assert_eq!(raw["2024-03-10"]["version"], "4.0");
}

#[cfg(unix)]
#[test]
fn test_store_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("daybook");
    let store = EntryStore::open(&data_dir, DayCounter::default());
    DraftSession::open(&store, day(2024, 3, 10)).save(&store).unwrap();

    let dir_mode = fs::metadata(&data_dir).unwrap().permissions().mode() & 0o777;
    let file_mode = fs::metadata(data_dir.join("diary_entries.json"))
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(dir_mode, 0o700);
    assert_eq!(file_mode, 0o600);
}

#[test]
fn test_writes_fail_fast_while_another_writer_holds_the_lock() {
    let dir = tempdir().unwrap();
    let store = EntryStore::open(dir.path(), DayCounter::default());
    DraftSession::open(&store, day(2024, 3, 9)).save(&store).unwrap();
    let held = FileBackend::new(dir.path()).lock().unwrap();

    let result = import_entries(&store, r#"[{"date": "2024-03-10"}]"#);
    assert!(matches!(
        result,
        Err(AppError::Lock(LockError::StoreBusy { .. }))
    ));
    assert!(store.clear().is_err());
    assert!(store.delete("2024-03-09").is_err());

    drop(held);
    assert_eq!(
        import_entries(&store, r#"[{"date": "2024-03-10"}]"#)
            .unwrap()
            .count,
        1
    );
    assert!(store.exists("2024-03-09"));
}

#[test]
fn test_import_of_legacy_date_keyed_document() {
    let store = EntryStore::in_memory(DayCounter::default());
    let legacy = json!({
        "2023-12-31": {
            "environment": {"temperature_c": "-5-3", "air_quality_index": "55"},
            "mental_and_emotional_health": {
                "mood_timeline": {"morning": {"mood_level": 0}}
            },
            "daily_activity_summary": 1234
        },
        "settings": {"theme": "dark"}
    })
    .to_string();

    let report = import_entries(&store, &legacy).unwrap();
    assert_eq!(report.shape, ImportShape::DateKeyedMap);
    assert_eq!(report.count, 1);

    let entry = store.get("2023-12-31").unwrap();
    let range = entry.environment.temperature_range().unwrap();
    assert_eq!((range.min.as_str(), range.max.as_str()), ("-5", "3"));
    assert_eq!(entry.environment.air_quality_index, Some(55));
    assert_eq!(entry.morning_mood(), 5);
    assert_eq!(entry.daily_activity_summary, "1234");
    assert_eq!(entry.weekday, "Sunday");
}

#[test]
fn test_backup_export_and_history_work_together() {
    let store = EntryStore::in_memory(DayCounter::default());
    let counter = *store.counter();
    let mut batch = Vec::new();
    for (d, level, summary) in [(8, 8, "Beach"), (9, 3, ""), (10, 7, "Museum")] {
        let date = day(2024, 3, d);
        let mut entry = Entry::draft(date, &counter);
        entry
            .mental_and_emotional_health
            .mood_timeline
            .morning
            .mood_level = level;
        entry.daily_activity_summary = summary.to_string();
        batch.push((entry.date.clone(), entry));
    }
    store.save_many(&batch).unwrap();

    let snapshot = store.get_all();
    let happy = history::list(&snapshot, "", &HistoryFilter::Happy, day(2024, 3, 10));
    let happy_dates: Vec<&str> = happy.iter().map(|(d, _)| d.as_str()).collect();
    assert_eq!(happy_dates, vec!["2024-03-10", "2024-03-08"]);

    let rows = history::rows(&history::list(
        &snapshot,
        "",
        &HistoryFilter::All,
        day(2024, 3, 10),
    ));
    assert_eq!(rows[1].preview, "No summary provided...");

    let selected: Vec<Value> = serde_json::from_str(
        &export_entries(&store, &["2024-03-09".to_string(), "2024-03-08".to_string()]).unwrap(),
    )
    .unwrap();
    assert_eq!(selected[0]["date"], "2024-03-09");

    let restored = EntryStore::in_memory(DayCounter::default());
    let report = import_entries(&restored, &create_backup(&store).unwrap()).unwrap();
    assert_eq!(report.count, 3);
    assert_eq!(restored.get_all(), snapshot);
}

#[test]
fn test_carry_forward_then_navigate() {
    let store = EntryStore::in_memory(DayCounter::default());
    let mut yesterday = Entry::draft(day(2024, 3, 9), store.counter());
    yesterday.environment.weather_condition = "Drizzle".to_string();
    store.save("2024-03-09", &yesterday).unwrap();

    let mut session = DraftSession::open(&store, day(2024, 3, 10));
    assert!(session.carry_forward(&store, Section::Environment, Instant::now()));
    assert!(session.navigate(&store, -1).is_err());

    session.save(&store).unwrap();
    session.navigate(&store, -1).unwrap();
    assert_eq!(session.draft().environment.weather_condition, "Drizzle");
    assert_eq!(
        store.get("2024-03-10").unwrap().environment.weather_condition,
        "Drizzle"
    );
}
