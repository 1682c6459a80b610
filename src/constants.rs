//! Constants used throughout the application.
//!
//! This module contains all constants used in the Daybook application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daybook";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A daily wellbeing diary with local storage, search and backups";

// CLI Arguments & Defaults
/// Default command for the editor if not specified otherwise.
pub const DEFAULT_EDITOR_COMMAND: &str = "vim";
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the data directory.
pub const ENV_VAR_DAYBOOK_DIR: &str = "DAYBOOK_DIR";
/// Environment variable for specifying the preferred editor.
pub const ENV_VAR_DAYBOOK_EDITOR: &str = "DAYBOOK_EDITOR";
/// Standard environment variable for specifying the default editor.
pub const ENV_VAR_EDITOR: &str = "EDITOR";
/// Environment variable overriding the reference date used for day numbering.
pub const ENV_VAR_DAYBOOK_EPOCH: &str = "DAYBOOK_EPOCH";
/// Environment variable for the default log level when `RUST_LOG` is unset.
pub const ENV_VAR_DAYBOOK_LOG_LEVEL: &str = "DAYBOOK_LOG_LEVEL";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for the data directory within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = "Documents/daybook";

// Validation
/// Characters forbidden in editor commands for security reasons.
pub const EDITOR_FORBIDDEN_CHARS: &[char] =
    &['|', '&', ';', '$', '(', ')', '`', '\\', '<', '>', '\'', '"'];
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Storage
/// Fixed storage key: the single file holding the date -> entry mapping.
pub const STORE_FILE_NAME: &str = "diary_entries.json";
/// Suffix of the advisory lock file that sits next to the store file.
pub const STORE_LOCK_SUFFIX: &str = ".lock";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Entry Schema
/// Schema tag written into freshly created entries.
pub const ENTRY_SCHEMA_VERSION: &str = "4.0";
/// Reference date for `day_id` numbering (ISO format).
pub const DEFAULT_EPOCH: &str = "2003-07-04";
/// Maximum number of rows in the most-used-apps list.
pub const MAX_APP_ROWS: usize = 5;
/// Mood level used when a period carries no level.
pub const DEFAULT_MOOD_LEVEL: u8 = 5;
/// Value used by "Yes"/"No" status fields to mean yes.
pub const STATUS_YES: &str = "Yes";
/// Value used by "Yes"/"No" status fields to mean no.
pub const STATUS_NO: &str = "No";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Debounce window for draft autosave, in milliseconds.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 500;

// History
/// Morning mood level at or above which an entry counts as happy.
pub const HAPPY_MOOD_THRESHOLD: u8 = 7;
/// Inclusive number of days covered by the `week` filter.
pub const WEEK_FILTER_DAYS: i64 = 7;
/// Number of summary characters shown in a history row preview.
pub const PREVIEW_CHARS: usize = 60;
/// Preview text used when an entry has no daily summary.
pub const EMPTY_SUMMARY_PREVIEW: &str = "No summary provided...";

// Export
/// File name prefix of bulk backups.
pub const BACKUP_FILE_PREFIX: &str = "diary-backup-";
/// File name prefix of multi-entry exports.
pub const MULTI_EXPORT_FILE_PREFIX: &str = "diary_export_";
/// Extension of every exported file.
pub const EXPORT_FILE_EXTENSION: &str = ".json";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "daybook";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
