//! Command-line interface of the `daybook` binary.
//!
//! Dates accept `YYYY-MM-DD` or `YYYYMMDD`. Commands that take an optional
//! date default to today.

use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::entry::days::parse_user_date;
use crate::session::Section;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(
        long,
        global = true,
        value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON],
        default_value = LOG_FORMAT_TEXT
    )]
    pub log_format: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the stored entry for a date, or the blank draft if there is none
    Show {
        #[clap(short, long, value_parser = parse_user_date)]
        date: Option<NaiveDate>,
    },

    /// Save an entry document read from a file or stdin
    Save {
        #[clap(short, long, value_parser = parse_user_date)]
        date: NaiveDate,

        /// JSON file to read; stdin when omitted
        #[clap(short, long)]
        file: Option<PathBuf>,
    },

    /// Edit the entry for a date as JSON in your editor
    Edit {
        #[clap(short, long, value_parser = parse_user_date)]
        date: Option<NaiveDate>,
    },

    /// Delete the entry for a date
    Delete {
        #[clap(short, long, value_parser = parse_user_date)]
        date: NaiveDate,
    },

    /// Exit 0 if an entry is stored for the date, 1 otherwise
    Exists {
        #[clap(short, long, value_parser = parse_user_date)]
        date: NaiveDate,
    },

    /// Delete every entry
    Clear {
        /// Confirm the irreversible wipe
        #[clap(long)]
        yes: bool,
    },

    /// List entries, newest first
    List {
        /// Case-insensitive text to look for anywhere in an entry
        #[clap(short, long)]
        search: Option<String>,

        /// One of all, happy, week, complete
        #[clap(short, long, default_value = "all")]
        filter: String,
    },

    /// Report which sections of an entry are complete
    Check {
        #[clap(short, long, value_parser = parse_user_date)]
        date: Option<NaiveDate>,
    },

    /// Write one entry to {date}.json
    Export {
        #[clap(short, long, value_parser = parse_user_date)]
        date: NaiveDate,

        #[clap(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Write several entries to one JSON array
    ExportMany {
        #[clap(short = 'd', long = "date", value_parser = parse_user_date, required = true, num_args = 1..)]
        dates: Vec<NaiveDate>,

        #[clap(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Write a timestamped backup of all entries
    Backup {
        #[clap(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Import entries from a JSON file
    Import { file: PathBuf },

    /// Copy a section from the previous day's entry
    Carry {
        /// environment or personal-care
        #[clap(short, long)]
        section: Section,

        #[clap(short, long, value_parser = parse_user_date)]
        date: Option<NaiveDate>,
    },

    /// List values used before
    Suggest {
        #[clap(value_enum)]
        kind: SuggestKind,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestKind {
    Weather,
    Care,
    Apps,
}
