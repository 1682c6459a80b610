//! Error handling utilities for the daybook application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Storage and parse failures are converted into `AppError` values where they
//! happen. Nothing in the library panics on bad input or a failing backend; the
//! binary reports the error on stderr and exits non-zero.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur when interacting with external editors.
///
/// # Examples
///
/// ```
/// use daybook::errors::EditorError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "command not found");
/// let error = EditorError::CommandNotFound {
///     command: "vim".to_string(),
///     source: io_error,
/// };
///
/// assert!(format!("{}", error).contains("not found"));
/// assert!(format!("{}", error).contains("vim"));
/// ```
#[derive(Debug, Error)]
pub enum EditorError {
    /// Error when the specified editor command cannot be found.
    #[error("Editor command '{command}' not found: {source}. Please check that the editor is installed and available in your PATH.")]
    CommandNotFound {
        /// The editor command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when permission is denied to execute the editor command.
    #[error("Permission denied when trying to execute editor '{command}': {source}. Please check file permissions or try running with appropriate access rights.")]
    PermissionDenied {
        /// The editor command that had permission denied
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor command fails to execute due to other I/O errors.
    #[error("Failed to execute editor '{command}': {source}. Please check system resources, disk space, or editor installation.")]
    ExecutionFailed {
        /// The editor command that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor exits with a non-zero status code.
    #[error("Editor '{command}' exited with non-zero status code: {status_code}. The draft was not saved.")]
    NonZeroExit {
        /// The editor command that exited with a non-zero status
        command: String,
        /// The exit status code
        status_code: i32,
    },
}

/// Represents errors that can occur when attempting to lock the entry store.
///
/// # Examples
///
/// ```
/// use daybook::errors::LockError;
/// use std::path::PathBuf;
///
/// let error = LockError::StoreBusy {
///     path: PathBuf::from("/data/diary_entries.json.lock"),
/// };
///
/// assert!(format!("{}", error).contains("another process"));
/// ```
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process holds the store lock.
    #[error("Entry store is locked by another process: {path}. Please wait for the other daybook command to finish.")]
    StoreBusy {
        /// The path of the lock file
        path: PathBuf,
    },

    /// Acquiring the lock failed for a technical reason.
    #[error("Failed to acquire lock {path}: {source}. Please check file permissions and ensure the data directory is accessible.")]
    AcquisitionFailed {
        /// The path of the lock file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Failures of the storage layer underneath the entry store.
///
/// # Examples
///
/// ```
/// use daybook::errors::PersistenceError;
///
/// let error = PersistenceError::QuotaExceeded { limit: 10, needed: 42 };
/// assert!(format!("{}", error).contains("quota"));
/// ```
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing blob could not be read.
    #[error("Failed to read entry store {path}: {source}")]
    Read {
        /// Location of the backing blob
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The backing blob could not be written.
    #[error("Failed to write entry store {path}: {source}")]
    Write {
        /// Location of the backing blob
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The backend refused the write because it would exceed its capacity.
    #[error("Storage quota exceeded: {needed} bytes needed, limit is {limit} bytes")]
    QuotaExceeded {
        /// Capacity of the backend in bytes
        limit: usize,
        /// Size of the rejected blob in bytes
        needed: usize,
    },

    /// The stored blob exists but is not a date -> entry mapping.
    #[error("Stored entries are unreadable: {0}. Refusing to overwrite them; restore from a backup or move the file aside.")]
    Corrupt(String),
}

/// Represents all possible errors that can occur in the daybook application.
///
/// # Examples
///
/// ```
/// use daybook::errors::AppError;
///
/// let error = AppError::Validation("Date is required".to_string());
/// assert_eq!(format!("{}", error), "Validation error: Date is required");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// A required identifier (usually the entry date) is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The storage layer failed to read or write the entry mapping.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Import text is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Import JSON is valid but matches none of the recognized shapes.
    #[error("Format error: {0}")]
    Format(String),

    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations outside the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors related to store locking.
    #[error("Store locking error: {0}")]
    Lock(#[from] LockError),

    /// Errors when interacting with the text editor.
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use daybook::errors::{AppResult, AppError};
///
/// fn require_date(date: &str) -> AppResult<&str> {
///     if date.is_empty() {
///         return Err(AppError::Validation("Date is required".to_string()));
///     }
///     Ok(date)
/// }
///
/// assert!(require_date("").is_err());
/// ```
pub type AppResult<T> = Result<T, AppError>;
