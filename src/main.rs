/*!
# Daybook - A Daily Wellbeing Diary

Daybook keeps one structured diary entry per calendar day: environment,
body measurements, sleep and fitness, a four-period mood timeline, meals,
personal care, app usage and free-text summaries. Entries live in a single
JSON file in the data directory and can be searched, exported, backed up and
re-imported.

## Usage

```text
daybook [OPTIONS] <COMMAND>

Commands:
  show         Print the stored entry for a date, or the blank draft if there is none
  save         Save an entry document read from a file or stdin
  edit         Edit the entry for a date as JSON in your editor
  delete       Delete the entry for a date
  exists       Exit 0 if an entry is stored for the date, 1 otherwise
  clear        Delete every entry
  list         List entries, newest first
  check        Report which sections of an entry are complete
  export       Write one entry to {date}.json
  export-many  Write several entries to one JSON array
  backup       Write a timestamped backup of all entries
  import       Import entries from a JSON file
  carry        Copy a section from the previous day's entry
  suggest      List values used before

Options:
  -v, --verbose                  Log at debug level unless RUST_LOG says otherwise
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
```

## Configuration

- `DAYBOOK_DIR`: data directory (defaults to "~/Documents/daybook")
- `DAYBOOK_EDITOR` or `EDITOR`: editor used by `daybook edit` (defaults to "vim")
- `DAYBOOK_EPOCH`: reference date for day numbering (defaults to 2003-07-04)
- `DAYBOOK_LOG_LEVEL`: log level when `RUST_LOG` is unset (defaults to "info")
*/

use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use daybook::cli::{CliArgs, Command, SuggestKind};
use daybook::config::Config;
use daybook::constants::{
    DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
};
use daybook::editor::SystemEditor;
use daybook::entry::days::date_key;
use daybook::entry::mood::mood_emoji;
use daybook::entry::{missing_fields, Entry, SectionGroup};
use daybook::errors::{AppError, AppResult};
use daybook::history::{self, HistoryFilter};
use daybook::ops::{self, EditOutcome};
use daybook::session::DraftSession;
use daybook::store::EntryStore;
use std::fs;
use std::io;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn init_logging(format: &str, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if format == LOG_FORMAT_JSON {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config = Config::load();

    let default_level = match (&config, args.verbose) {
        (_, true) => "debug",
        (Ok(config), false) => config.log_level.as_str(),
        (Err(_), false) => DEFAULT_LOG_LEVEL,
    };
    init_logging(&args.log_format, default_level);

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();
    debug!("CLI arguments: {:?}", args);

    let result = config.and_then(|config| {
        debug!("Loaded configuration: {:?}", config);
        run(&config, args.command)
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn run(config: &Config, command: Command) -> AppResult<ExitCode> {
    let store = config.open_store();
    info!("Running {:?}", command);

    match command {
        Command::Show { date } => {
            let date = date.unwrap_or_else(today);
            let entry = store
                .get(&date_key(date))
                .unwrap_or_else(|| Entry::draft(date, store.counter()));
            println!("{}", to_pretty(&entry)?);
        }

        Command::Save { date, file } => {
            let raw = match file {
                Some(path) => fs::read_to_string(path)?,
                None => io::read_to_string(io::stdin())?,
            };
            let entry: Entry =
                serde_json::from_str(&raw).map_err(|e| AppError::Parse(e.to_string()))?;
            let mut session = DraftSession::open(&store, date);
            session.modify(|draft| *draft = entry, Instant::now());
            session.save(&store)?;
            println!("Saved entry for {}", date);
        }

        Command::Edit { date } => {
            let date = date.unwrap_or_else(today);
            let editor = SystemEditor::new(config.editor.clone());
            match ops::edit_entry(&store, &editor, date)? {
                EditOutcome::Saved => println!("Saved entry for {}", date),
                EditOutcome::Unchanged => println!("No changes for {}", date),
            }
        }

        Command::Delete { date } => {
            if store.delete(&date_key(date))? {
                println!("Deleted entry for {}", date);
            } else {
                println!("No entry for {}", date);
            }
        }

        Command::Exists { date } => {
            return Ok(if store.exists(&date_key(date)) {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            });
        }

        Command::Clear { yes } => {
            if !yes {
                return Err(AppError::Validation(
                    "Clearing deletes every entry; pass --yes to confirm".to_string(),
                ));
            }
            store.clear()?;
            println!("Cleared all entries");
        }

        Command::List { search, filter } => {
            let filter = filter.parse::<HistoryFilter>().unwrap_or_default();
            let snapshot = store.get_all();
            let listing = history::list(&snapshot, search.as_deref().unwrap_or(""), &filter, today());
            if listing.is_empty() {
                println!("No entries found");
            }
            for row in history::rows(&listing) {
                println!(
                    "{}  {} {:>2}  {:<10}  {}",
                    row.date,
                    mood_emoji(row.mood_level),
                    row.mood_level,
                    if row.complete { "complete" } else { "incomplete" },
                    row.preview
                );
            }
        }

        Command::Check { date } => {
            let date = date.unwrap_or_else(today);
            match store.get(&date_key(date)) {
                Some(entry) => print_check(&entry),
                None => println!("No entry for {}", date),
            }
        }

        Command::Export { date, out } => {
            match ops::write_export(&store, &date_key(date), &out)? {
                Some(path) => println!("Exported {} to {}", date, path.display()),
                None => println!("No entry for {}; nothing exported", date),
            }
        }

        Command::ExportMany { dates, out } => {
            let keys: Vec<String> = dates.into_iter().map(date_key).collect();
            let path = ops::write_multi_export(&store, &keys, &out)?;
            println!("Exported {} dates to {}", keys.len(), path.display());
        }

        Command::Backup { out } => {
            let path = ops::write_backup(&store, &out, Utc::now())?;
            println!("Backup written to {}", path.display());
        }

        Command::Import { file } => {
            let report = ops::import_file(&store, &file)?;
            println!("Imported {} entries", report.count);
            if report.skipped > 0 {
                println!("Skipped {} unreadable entries", report.skipped);
            }
        }

        Command::Carry { section, date } => {
            let date = date.unwrap_or_else(today);
            let mut session = DraftSession::open(&store, date);
            if session.carry_forward(&store, section, Instant::now()) {
                session.save(&store)?;
                println!("Copied {} from the previous day into {}", section, date);
            } else {
                println!("No data for previous day");
            }
        }

        Command::Suggest { kind } => print_suggestions(&store, kind),
    }

    Ok(ExitCode::SUCCESS)
}

fn to_pretty(entry: &Entry) -> AppResult<String> {
    serde_json::to_string_pretty(entry).map_err(|e| AppError::Format(e.to_string()))
}

fn print_check(entry: &Entry) {
    for group in SectionGroup::ALL {
        let missing = missing_fields(entry, group);
        if missing.is_empty() {
            println!("{:<22} complete", group.label());
        } else {
            println!("{:<22} missing: {}", group.label(), missing.join(", "));
        }
    }
    println!(
        "{:<22} {}",
        "overall",
        if entry.is_complete() { "complete" } else { "incomplete" }
    );

    let timeline = &entry.mental_and_emotional_health.mood_timeline;
    for period in timeline.inconsistent_periods() {
        println!(
            "warning: {} mood feeling does not belong to its category",
            period.key()
        );
    }
    if entry.activities_and_productivity.app_time_exceeds_screen_time() {
        println!("warning: app usage adds up to more than the screen-on time");
    }
}

fn print_suggestions(store: &EntryStore, kind: SuggestKind) {
    let snapshot = store.get_all();
    match kind {
        SuggestKind::Weather => print_list(&history::weather_suggestions(&snapshot)),
        SuggestKind::Apps => print_list(&history::app_name_suggestions(&snapshot)),
        SuggestKind::Care => {
            let care = history::personal_care_suggestions(&snapshot);
            for (heading, values) in [
                ("face products", &care.face_product_names),
                ("face brands", &care.face_product_brands),
                ("hair products", &care.hair_product_names),
                ("hair brands", &care.hair_product_brands),
                ("hair oils", &care.hair_oils),
            ] {
                println!("{}:", heading);
                for value in values {
                    println!("  {}", value);
                }
            }
        }
    }
}

fn print_list(values: &[String]) {
    for value in values {
        println!("{}", value);
    }
}
