//! Export, backup and import through files on disk.

use crate::codec::{
    backup_file_name, create_backup, entry_file_name, export_entries, export_entry,
    import_entries, multi_export_file_name, ImportReport,
};
use crate::errors::AppResult;
use crate::store::{EntryStore, StorageBackend};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn write_output(out_dir: &Path, file_name: &str, contents: &str) -> AppResult<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(file_name);
    fs::write(&path, contents)?;
    debug!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(path)
}

/// Writes `{date}.json` into `out_dir`. Returns `None`, writing nothing, if
/// no entry is stored for `date`.
pub fn write_export<B: StorageBackend>(
    store: &EntryStore<B>,
    date: &str,
    out_dir: &Path,
) -> AppResult<Option<PathBuf>> {
    let Some(json) = export_entry(store, date) else {
        debug!("No entry for {}, nothing exported", date);
        return Ok(None);
    };
    let path = write_output(out_dir, &entry_file_name(date), &json)?;
    info!("Exported {} to {:?}", date, path);
    Ok(Some(path))
}

/// Writes the selected entries as one array to `diary_export_{n}.json`, where
/// `n` is the number of dates selected.
pub fn write_multi_export<B: StorageBackend>(
    store: &EntryStore<B>,
    dates: &[String],
    out_dir: &Path,
) -> AppResult<PathBuf> {
    let json = export_entries(store, dates)?;
    let path = write_output(out_dir, &multi_export_file_name(dates.len()), &json)?;
    info!("Exported {} selected dates to {:?}", dates.len(), path);
    Ok(path)
}

/// Writes a timestamped backup of every entry into `out_dir`.
pub fn write_backup<B: StorageBackend>(
    store: &EntryStore<B>,
    out_dir: &Path,
    now: DateTime<Utc>,
) -> AppResult<PathBuf> {
    let json = create_backup(store)?;
    let path = write_output(out_dir, &backup_file_name(now), &json)?;
    info!("Wrote backup to {:?}", path);
    Ok(path)
}

/// Imports a JSON document read from `path`.
pub fn import_file<B: StorageBackend>(store: &EntryStore<B>, path: &Path) -> AppResult<ImportReport> {
    let raw = fs::read_to_string(path)?;
    debug!("Read {} bytes of import data from {:?}", raw.len(), path);
    import_entries(store, &raw)
}
