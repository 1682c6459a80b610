/*!
# Daybook

Daybook is a daily wellbeing diary. Each calendar day gets one structured
entry covering the environment, body and health, a four-period mood
timeline, meals and personal care, activities and app usage, and free-text
summaries. Entries are kept in one JSON document mapping dates to entries.

## Core Features

- Save, load and delete entries keyed by `YYYY-MM-DD`
- Strict completeness checks per section group
- History listing with text search and `all`/`happy`/`week`/`complete` filters
- JSON export of one or several entries, full backups, and import of three document shapes
- A draft session with debounced autosave and carry-forward from the previous day

## Architecture

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `constants`: Names, defaults and limits
- `errors`: Error handling infrastructure
- `entry`: The entry model, mood vocabulary and completeness rules
- `store`: Date-keyed persistence over a pluggable backend
- `codec`: Import, export and backup documents
- `history`: Listing, filtering and suggestions
- `session`: Draft editing state for one date
- `editor`: External editor abstraction
- `ops`: File and editor side effects used by the binary

## Usage Example

```rust
use daybook::codec::{create_backup, import_entries};
use daybook::entry::{DayCounter, Entry};
use daybook::store::EntryStore;
use chrono::NaiveDate;

fn main() -> daybook::AppResult<()> {
    let store = EntryStore::in_memory(DayCounter::default());
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

    let mut entry = Entry::draft(date, store.counter());
    entry.daily_activity_summary = "Long walk by the river".to_string();
    store.save("2024-03-10", &entry)?;

    let backup = create_backup(&store)?;
    let restored = EntryStore::in_memory(DayCounter::default());
    assert_eq!(import_entries(&restored, &backup)?.count, 1);
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Import, export and backup documents
pub mod codec;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// External editor abstraction
pub mod editor;
/// Entry model and completeness rules
pub mod entry;
/// Error types and utilities for error handling
pub mod errors;
/// History listing and suggestions
pub mod history;
/// High-level command handlers
pub mod ops;
/// Draft editing session
pub mod session;
/// Entry persistence
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use entry::Entry;
pub use errors::{AppError, AppResult};
pub use session::DraftSession;
pub use store::EntryStore;
