//! Configuration management for the daybook application.
//!
//! Settings come from environment variables, with defaults suitable for a
//! single user on one machine.
//!
//! # Environment Variables
//!
//! - `DAYBOOK_DIR`: Data directory holding the entry store (defaults to ~/Documents/daybook)
//! - `DAYBOOK_EDITOR`: Editor used by `daybook edit`
//! - `EDITOR`: Fallback editor if DAYBOOK_EDITOR is not set (defaults to "vim")
//! - `DAYBOOK_EPOCH`: Reference date for day numbering, `YYYY-MM-DD` (defaults to 2003-07-04)
//! - `DAYBOOK_LOG_LEVEL`: Log level used when `RUST_LOG` is unset (defaults to "info")
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DATE_FORMAT_ISO, DEFAULT_DATA_SUBDIR, DEFAULT_EDITOR_COMMAND, DEFAULT_EPOCH,
    DEFAULT_LOG_LEVEL, EDITOR_FORBIDDEN_CHARS, ENV_VAR_DAYBOOK_DIR, ENV_VAR_DAYBOOK_EDITOR,
    ENV_VAR_DAYBOOK_EPOCH, ENV_VAR_DAYBOOK_LOG_LEVEL, ENV_VAR_EDITOR, ENV_VAR_HOME,
    REDACTED_PLACEHOLDER, STORE_FILE_NAME,
};
use crate::entry::DayCounter;
use crate::errors::{AppError, AppResult};
use crate::store::EntryStore;
use chrono::NaiveDate;
use std::env;
use std::fmt;
use std::path::PathBuf;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Runtime configuration.
///
/// # Examples
///
/// ```
/// use daybook::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/var/lib/daybook"),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// assert!(config.store_path().ends_with("diary_entries.json"));
/// ```
#[derive(Clone)]
pub struct Config {
    /// Directory holding the store file and its lock file.
    pub data_dir: PathBuf,

    /// Editor command, from DAYBOOK_EDITOR, then EDITOR, then "vim".
    pub editor: String,

    /// Reference date for `day_id`.
    pub epoch: NaiveDate,

    /// Default log level when RUST_LOG is unset.
    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("editor", &REDACTED_PLACEHOLDER)
            .field("epoch", &self.epoch)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::new(),
            editor: DEFAULT_EDITOR_COMMAND.to_string(),
            epoch: DayCounter::default().epoch(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Checks that an editor command can be run without a shell.
    ///
    /// Rejects empty commands, commands with spaces and commands containing
    /// shell metacharacters. Editors that need arguments should be wrapped in
    /// a script.
    pub fn validate_editor_command(editor_cmd: &str) -> AppResult<&str> {
        if editor_cmd.is_empty() {
            return Err(AppError::Config(
                "Editor command cannot be empty".to_string(),
            ));
        }

        if editor_cmd.contains(' ') {
            return Err(AppError::Config(
                "Editor command cannot contain spaces. Use a wrapper script for editors requiring arguments".to_string(),
            ));
        }

        if let Some(ch) = editor_cmd.chars().find(|c| EDITOR_FORBIDDEN_CHARS.contains(c)) {
            return Err(AppError::Config(format!(
                "Editor command cannot contain shell metacharacters: '{}'. Use a wrapper script instead",
                ch
            )));
        }

        Ok(editor_cmd)
    }

    fn parse_epoch(raw: &str) -> AppResult<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT_ISO).map_err(|e| {
            AppError::Config(format!(
                "Invalid {} '{}': {}. Expected YYYY-MM-DD",
                ENV_VAR_DAYBOOK_EPOCH, raw, e
            ))
        })
    }

    fn parse_log_level(raw: &str) -> AppResult<String> {
        let level = raw.trim().to_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            Ok(level)
        } else {
            Err(AppError::Config(format!(
                "Invalid {} '{}'. Expected one of: {}",
                ENV_VAR_DAYBOOK_LOG_LEVEL,
                raw,
                LOG_LEVELS.join(", ")
            )))
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// The data directory is expanded with `shellexpand`, so `~` and `$VAR`
    /// references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory cannot be expanded or is not absolute
    /// - The editor command fails validation
    /// - The epoch is not a `YYYY-MM-DD` date
    /// - The log level is not one of trace, debug, info, warn, error
    pub fn load() -> AppResult<Self> {
        let editor_raw = env::var(ENV_VAR_DAYBOOK_EDITOR)
            .or_else(|_| env::var(ENV_VAR_EDITOR))
            .unwrap_or_else(|_| DEFAULT_EDITOR_COMMAND.to_string());
        let editor = Config::validate_editor_command(&editor_raw)?.to_string();

        let data_dir_raw = env::var(ENV_VAR_DAYBOOK_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });
        let expanded = shellexpand::full(&data_dir_raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded.into_owned());

        let epoch = match env::var(ENV_VAR_DAYBOOK_EPOCH) {
            Ok(raw) => Config::parse_epoch(&raw)?,
            Err(_) => Config::parse_epoch(DEFAULT_EPOCH)?,
        };

        let log_level = match env::var(ENV_VAR_DAYBOOK_LOG_LEVEL) {
            Ok(raw) => Config::parse_log_level(&raw)?,
            Err(_) => DEFAULT_LOG_LEVEL.to_string(),
        };

        let config = Config {
            data_dir,
            editor,
            epoch,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-checks the invariants `load` establishes.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the data directory is empty or relative,
    /// or if the editor command is invalid.
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }
        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }
        Config::validate_editor_command(&self.editor)?;
        Ok(())
    }

    /// Path of the store file inside the data directory.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }

    pub fn day_counter(&self) -> DayCounter {
        DayCounter::new(self.epoch)
    }

    /// Opens the file-backed entry store for this configuration.
    pub fn open_store(&self) -> EntryStore {
        EntryStore::open(&self.data_dir, self.day_counter())
    }
}
