//! Storage backends holding the serialized entry mapping.
//!
//! A backend stores one opaque text blob. It knows nothing about entries;
//! [`EntryStore`](super::EntryStore) owns the encoding.

use crate::constants::{STORE_FILE_NAME, STORE_LOCK_SUFFIX};
use crate::errors::{AppResult, LockError, PersistenceError};
use fs2::FileExt;
use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

#[cfg(unix)]
use crate::constants::{DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Exclusive write access to a backend, released on drop.
#[derive(Debug)]
pub struct WriteGuard {
    lock_file: Option<File>,
}

impl WriteGuard {
    /// A guard for backends that need no cross-process lock.
    pub fn uncontended() -> Self {
        WriteGuard { lock_file: None }
    }

    fn holding(file: File) -> Self {
        WriteGuard {
            lock_file: Some(file),
        }
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        if let Some(file) = self.lock_file.take() {
            if let Err(e) = FileExt::unlock(&file) {
                warn!("Failed to release store lock: {}", e);
            }
        }
    }
}

/// Persistence of the single serialized blob behind an [`EntryStore`](super::EntryStore).
pub trait StorageBackend {
    /// Returns the stored blob, or `None` if nothing has been stored yet.
    fn read(&self) -> AppResult<Option<String>>;

    /// Replaces the stored blob. Either the whole blob is written or nothing is.
    fn write(&self, blob: &str) -> AppResult<()>;

    /// Deletes the stored blob. Removing an absent blob is not an error.
    fn remove(&self) -> AppResult<()>;

    /// Takes exclusive write access for one read-modify-write cycle.
    fn lock(&self) -> AppResult<WriteGuard>;

    /// Where the blob lives, for log and error messages.
    fn location(&self) -> String;
}

/// Stores the blob as `diary_entries.json` inside a data directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the store file, so a crash never leaves a half-written mapping.
/// Read-modify-write cycles hold an advisory lock on a sibling `.lock` file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(STORE_FILE_NAME);
        let lock_path = dir.join(format!("{}{}", STORE_FILE_NAME, STORE_LOCK_SUFFIX));
        FileBackend {
            dir,
            path,
            lock_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    fn ensure_dir(&self) -> AppResult<()> {
        if !self.dir.exists() {
            debug!("Creating data directory {:?}", self.dir);
            fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::Write {
                path: self.dir.clone(),
                source,
            })?;

            #[cfg(unix)]
            fs::set_permissions(&self.dir, fs::Permissions::from_mode(DEFAULT_DIR_PERMISSIONS))
                .map_err(|source| PersistenceError::Write {
                    path: self.dir.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    fn write_atomically(&self, blob: &str) -> io::Result<()> {
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(blob.as_bytes())?;
        temp.as_file().sync_all()?;

        #[cfg(unix)]
        fs::set_permissions(
            temp.path(),
            fs::Permissions::from_mode(DEFAULT_FILE_PERMISSIONS),
        )?;

        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> AppResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Read {
                path: self.path.clone(),
                source,
            }
            .into()),
        }
    }

    fn write(&self, blob: &str) -> AppResult<()> {
        self.ensure_dir()?;
        self.write_atomically(blob)
            .map_err(|source| PersistenceError::Write {
                path: self.path.clone(),
                source,
            })?;
        debug!("Wrote {} bytes to {:?}", blob.len(), self.path);
        Ok(())
    }

    fn remove(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Write {
                path: self.path.clone(),
                source,
            }
            .into()),
        }
    }

    fn lock(&self) -> AppResult<WriteGuard> {
        self.ensure_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(|source| LockError::AcquisitionFailed {
                path: self.lock_path.clone(),
                source,
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!("Acquired store lock {:?}", self.lock_path);
                Ok(WriteGuard::holding(file))
            }
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.raw_os_error() == fs2::lock_contended_error().raw_os_error() =>
            {
                Err(LockError::StoreBusy {
                    path: self.lock_path.clone(),
                }
                .into())
            }
            Err(source) => Err(LockError::AcquisitionFailed {
                path: self.lock_path.clone(),
                source,
            }
            .into()),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the blob in memory, optionally capped at a byte quota.
///
/// Useful for tests and for embedding the store where no disk is available.
/// A quota of zero models storage that is disabled outright.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    blob: RefCell<Option<String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        MemoryBackend {
            blob: RefCell::new(None),
            quota: Some(quota),
        }
    }

    /// A backend that already holds `blob`, e.g. data written by another tool.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        MemoryBackend {
            blob: RefCell::new(Some(blob.into())),
            quota: None,
        }
    }

    /// The raw stored text.
    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> AppResult<Option<String>> {
        Ok(self.blob.borrow().clone())
    }

    fn write(&self, blob: &str) -> AppResult<()> {
        if let Some(limit) = self.quota {
            if blob.len() > limit {
                return Err(PersistenceError::QuotaExceeded {
                    limit,
                    needed: blob.len(),
                }
                .into());
            }
        }
        *self.blob.borrow_mut() = Some(blob.to_string());
        Ok(())
    }

    fn remove(&self) -> AppResult<()> {
        *self.blob.borrow_mut() = None;
        Ok(())
    }

    fn lock(&self) -> AppResult<WriteGuard> {
        Ok(WriteGuard::uncontended())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
