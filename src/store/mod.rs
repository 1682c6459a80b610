//! Durable date-keyed persistence of diary entries.
//!
//! All entries live in one JSON object mapping `YYYY-MM-DD` keys to entry
//! documents, stored as a single blob by a [`StorageBackend`]. Every mutation
//! is a full read-modify-write of that object, done under the backend's write
//! lock and written back in one piece.
//!
//! Reads never fail: an absent or unreadable blob looks like an empty store.
//! Writes are stricter and refuse to replace a blob they cannot parse, so a
//! damaged file is never silently overwritten.

mod backend;
#[cfg(test)]
mod tests;

pub use backend::{FileBackend, MemoryBackend, StorageBackend, WriteGuard};

use crate::entry::days::parse_entry_date;
use crate::entry::{DayCounter, Entry};
use crate::errors::{AppError, AppResult, PersistenceError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw stored mapping. Values stay as JSON so entries this version cannot
/// decode are written back untouched.
type RawMapping = Map<String, Value>;

/// Date-keyed entry persistence over a [`StorageBackend`].
#[derive(Debug)]
pub struct EntryStore<B: StorageBackend = FileBackend> {
    backend: B,
    counter: DayCounter,
}

impl EntryStore<FileBackend> {
    /// Opens the store file inside `data_dir`. Nothing is created until the first write.
    pub fn open(data_dir: &Path, counter: DayCounter) -> Self {
        EntryStore::new(FileBackend::new(data_dir), counter)
    }
}

impl EntryStore<MemoryBackend> {
    pub fn in_memory(counter: DayCounter) -> Self {
        EntryStore::new(MemoryBackend::new(), counter)
    }
}

impl<B: StorageBackend> EntryStore<B> {
    pub fn new(backend: B, counter: DayCounter) -> Self {
        EntryStore { backend, counter }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The day counter used to recompute derived fields on read.
    pub fn counter(&self) -> &DayCounter {
        &self.counter
    }

    fn parse_blob(blob: &str) -> Result<RawMapping, String> {
        if blob.trim().is_empty() {
            return Ok(RawMapping::new());
        }
        match serde_json::from_str::<Value>(blob) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!(
                "expected a JSON object keyed by date, found {}",
                json_kind(&other)
            )),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Loads the raw mapping for a write. Unreadable data is an error.
    fn load_for_write(&self) -> AppResult<RawMapping> {
        match self.backend.read()? {
            None => Ok(RawMapping::new()),
            Some(blob) => Self::parse_blob(&blob)
                .map_err(|reason| AppError::Persistence(PersistenceError::Corrupt(reason))),
        }
    }

    /// Loads the raw mapping for a read. Unreadable data reads as empty.
    fn load_for_read(&self) -> RawMapping {
        let blob = match self.backend.read() {
            Ok(Some(blob)) => blob,
            Ok(None) => return RawMapping::new(),
            Err(e) => {
                warn!("Could not read entry store {}: {}", self.backend.location(), e);
                return RawMapping::new();
            }
        };
        Self::parse_blob(&blob).unwrap_or_else(|reason| {
            warn!(
                "Entry store {} is unreadable, treating it as empty: {}",
                self.backend.location(),
                reason
            );
            RawMapping::new()
        })
    }

    fn persist(&self, mapping: &RawMapping) -> AppResult<()> {
        let blob = serde_json::to_string_pretty(mapping)
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        self.backend.write(&blob)
    }

    /// Decodes one stored value, keyed by `date`, with derived fields recomputed.
    fn decode(&self, date: &str, value: &Value) -> Option<Entry> {
        if parse_entry_date(date).is_err() {
            debug!("Ignoring stored key {:?}: not a date", date);
            return None;
        }
        match serde_json::from_value::<Entry>(value.clone()) {
            Ok(mut entry) => {
                entry.date = date.to_string();
                entry.refresh_derived(&self.counter);
                Some(entry)
            }
            Err(e) => {
                warn!("Skipping unreadable entry for {}: {}", date, e);
                None
            }
        }
    }

    fn encode(date: &str, entry: &Entry) -> AppResult<Value> {
        let mut entry = entry.clone();
        entry.date = date.to_string();
        serde_json::to_value(&entry).map_err(|e| {
            AppError::Validation(format!("Entry for {} cannot be serialized: {}", date, e))
        })
    }

    /// Inserts or overwrites the entry stored under `date`.
    ///
    /// The entry's own `date` field is set to `date` before it is written.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` if `date` is empty or not a valid `YYYY-MM-DD` date.
    /// - `AppError::Lock` if another process is writing the store.
    /// - `AppError::Persistence` if the stored data is unreadable or the
    ///   backend refuses the write, e.g. because its quota is full.
    pub fn save(&self, date: &str, entry: &Entry) -> AppResult<()> {
        parse_entry_date(date)?;
        let value = Self::encode(date, entry)?;

        let _guard = self.backend.lock()?;
        let mut mapping = self.load_for_write()?;
        mapping.insert(date.to_string(), value);
        self.persist(&mapping)?;

        info!("Saved entry for {}", date);
        Ok(())
    }

    /// Saves several entries in one write. Returns how many were stored.
    ///
    /// Every date is validated before anything is written; one bad date
    /// rejects the whole batch.
    pub fn save_many(&self, entries: &[(String, Entry)]) -> AppResult<usize> {
        let mut values = Vec::with_capacity(entries.len());
        for (date, entry) in entries {
            parse_entry_date(date)?;
            values.push((date.clone(), Self::encode(date, entry)?));
        }
        if values.is_empty() {
            return Ok(0);
        }

        let _guard = self.backend.lock()?;
        let mut mapping = self.load_for_write()?;
        let count = values.len();
        for (date, value) in values {
            mapping.insert(date, value);
        }
        self.persist(&mapping)?;

        info!("Saved {} entries", count);
        Ok(count)
    }

    /// The entry stored under `date`, if any.
    pub fn get(&self, date: &str) -> Option<Entry> {
        let mapping = self.load_for_read();
        let value = mapping.get(date)?;
        self.decode(date, value)
    }

    /// Every stored entry, ordered by date.
    ///
    /// Never fails: missing or unreadable data yields an empty map.
    pub fn get_all(&self) -> BTreeMap<String, Entry> {
        self.load_for_read()
            .iter()
            .filter_map(|(date, value)| Some((date.clone(), self.decode(date, value)?)))
            .collect()
    }

    pub fn exists(&self, date: &str) -> bool {
        self.load_for_read().contains_key(date)
    }

    /// Removes the entry under `date`. Returns whether one existed.
    pub fn delete(&self, date: &str) -> AppResult<bool> {
        Ok(self.delete_many(&[date.to_string()])? == 1)
    }

    /// Removes every listed date in one write. Returns how many existed.
    pub fn delete_many(&self, dates: &[String]) -> AppResult<usize> {
        if self.backend.read()?.is_none() {
            debug!("Nothing stored at {}, nothing to delete", self.backend.location());
            return Ok(0);
        }
        let _guard = self.backend.lock()?;
        let mut mapping = self.load_for_write()?;

        let removed = dates
            .iter()
            .filter(|date| mapping.remove(date.as_str()).is_some())
            .count();
        if removed > 0 {
            self.persist(&mapping)?;
            info!("Deleted {} entries", removed);
        } else {
            debug!("Nothing to delete for {:?}", dates);
        }
        Ok(removed)
    }

    /// Irreversibly removes every entry.
    ///
    /// Works on unreadable data too, since it never parses the stored blob.
    /// A store that was never written is left untouched.
    pub fn clear(&self) -> AppResult<()> {
        if self.backend.read()?.is_none() {
            debug!("Nothing stored at {}, nothing to clear", self.backend.location());
            return Ok(());
        }
        let _guard = self.backend.lock()?;
        self.backend.remove()?;
        info!("Cleared all entries from {}", self.backend.location());
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
