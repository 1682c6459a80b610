//! Edit one day's entry as JSON in an external editor.

use crate::editor::Editor;
use crate::entry::days::date_key;
use crate::entry::Entry;
use crate::errors::{AppError, AppResult};
use crate::session::DraftSession;
use crate::store::{EntryStore, StorageBackend};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info};

/// What an edit session did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Saved,
    Unchanged,
}

/// Opens the entry for `date` in `editor` and saves the edited document.
///
/// # Flow
///
/// 1. Load the stored entry, or a defaulted draft if there is none
/// 2. Write it pretty-printed to a private temporary `.json` file
/// 3. Wait for the editor to exit
/// 4. Parse the file back into an entry
/// 5. Save through a [`DraftSession`] unless nothing changed
///
/// An untouched new draft is not saved, so opening and closing the editor
/// never creates an entry.
///
/// # Errors
///
/// - `AppError::Editor` if the editor fails; nothing is saved.
/// - `AppError::Parse` if the edited file is not a valid entry document.
/// - Any store error from the final save.
pub fn edit_entry<B: StorageBackend>(
    store: &EntryStore<B>,
    editor: &dyn Editor,
    date: NaiveDate,
) -> AppResult<EditOutcome> {
    let mut session = DraftSession::open(store, date);
    let original = serde_json::to_string_pretty(session.draft())
        .map_err(|e| AppError::Format(e.to_string()))?;

    let mut draft_file = tempfile::Builder::new()
        .prefix(&format!("daybook-{}-", date_key(date)))
        .suffix(".json")
        .tempfile()?;
    draft_file.write_all(original.as_bytes())?;
    draft_file.flush()?;
    debug!("Wrote draft for {} to {:?}", date, draft_file.path());

    editor.edit(draft_file.path())?;

    let edited = fs::read_to_string(draft_file.path())?;
    if edited.trim() == original.trim() {
        info!("No changes to the entry for {}", date);
        return Ok(EditOutcome::Unchanged);
    }

    let entry: Entry = serde_json::from_str(&edited).map_err(|e| {
        AppError::Parse(format!("Edited entry for {} is not valid: {}", date, e))
    })?;
    session.modify(|draft| *draft = entry, Instant::now());
    session.save(store)?;

    info!("Saved edited entry for {}", date);
    Ok(EditOutcome::Saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::test_support::complete_entry;
    use crate::entry::DayCounter;
    use crate::errors::EditorError;
    use std::path::Path;

    /// Rewrites the file it is given with a fixed replacement.
    struct RewritingEditor<F: Fn(&str) -> String> {
        rewrite: F,
    }

    impl<F: Fn(&str) -> String> Editor for RewritingEditor<F> {
        fn edit(&self, path: &Path) -> AppResult<()> {
            let current = fs::read_to_string(path)?;
            fs::write(path, (self.rewrite)(&current))?;
            Ok(())
        }
    }

    struct FailingEditor;

    impl Editor for FailingEditor {
        fn edit(&self, _path: &Path) -> AppResult<()> {
            Err(AppError::Editor(EditorError::NonZeroExit {
                command: "vim".to_string(),
                status_code: 1,
            }))
        }
    }

    fn march_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_edit_saves_changes() {
        let store = EntryStore::in_memory(DayCounter::default());
        let editor = RewritingEditor {
            rewrite: |text: &str| {
                let mut entry: Entry = serde_json::from_str(text).unwrap();
                entry.daily_activity_summary = "Edited in vim".to_string();
                serde_json::to_string(&entry).unwrap()
            },
        };

        assert_eq!(
            edit_entry(&store, &editor, march_10()).unwrap(),
            EditOutcome::Saved
        );
        let stored = store.get("2024-03-10").unwrap();
        assert_eq!(stored.daily_activity_summary, "Edited in vim");
        assert_eq!(stored.environment.temperature_c, "15-25");
    }

    #[test]
    fn test_untouched_draft_is_not_saved() {
        let store = EntryStore::in_memory(DayCounter::default());
        let editor = RewritingEditor {
            rewrite: |text: &str| text.to_string(),
        };

        assert_eq!(
            edit_entry(&store, &editor, march_10()).unwrap(),
            EditOutcome::Unchanged
        );
        assert!(!store.exists("2024-03-10"));
    }

    #[test]
    fn test_editor_failure_saves_nothing() {
        let store = EntryStore::in_memory(DayCounter::default());
        store
            .save("2024-03-10", &complete_entry("2024-03-10"))
            .unwrap();

        assert!(matches!(
            edit_entry(&store, &FailingEditor, march_10()),
            Err(AppError::Editor(_))
        ));
        assert_eq!(
            store.get("2024-03-10"),
            Some(complete_entry("2024-03-10"))
        );
    }

    #[test]
    fn test_invalid_edit_is_a_parse_error() {
        let store = EntryStore::in_memory(DayCounter::default());
        let editor = RewritingEditor {
            rewrite: |_: &str| "{ this is not json".to_string(),
        };

        assert!(matches!(
            edit_entry(&store, &editor, march_10()),
            Err(AppError::Parse(_))
        ));
        assert!(!store.exists("2024-03-10"));
    }
}
