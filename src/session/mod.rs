//! The editing session for one date's draft.
//!
//! A [`DraftSession`] holds the date being edited, the draft entry and whether
//! the draft has unsaved changes. Command handlers receive it explicitly. Only
//! the store behind it is persistent.
//!
//! Autosave is debounced: [`DraftSession::modify`] records when the draft last
//! changed, and [`DraftSession::flush_if_due`] saves once that change is older
//! than the debounce window. Callers pass the current instant in, so there is
//! no timer thread and two saves can never overlap.

use crate::constants::AUTOSAVE_DEBOUNCE_MS;
use crate::entry::days::date_key;
use crate::entry::Entry;
use crate::errors::{AppError, AppResult};
use crate::store::{EntryStore, StorageBackend};
use chrono::{Days, NaiveDate};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Sections that can be copied from the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Environment,
    PersonalCare,
}

impl FromStr for Section {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "environment" => Ok(Section::Environment),
            "personal-care" | "personal_care" => Ok(Section::PersonalCare),
            other => Err(AppError::Validation(format!(
                "Unknown section '{}': expected environment or personal-care",
                other
            ))),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Environment => "environment",
            Section::PersonalCare => "personal-care",
        })
    }
}

/// Explicit editing state for one date.
#[derive(Debug, Clone)]
pub struct DraftSession {
    date: NaiveDate,
    draft: Entry,
    saved: Option<Entry>,
    dirty: bool,
    last_modified: Option<Instant>,
}

impl DraftSession {
    /// Loads the stored entry for `date`, or a defaulted draft if there is none.
    ///
    /// The new session is never dirty: defaults do not count as user edits.
    pub fn open<B: StorageBackend>(store: &EntryStore<B>, date: NaiveDate) -> Self {
        let saved = store.get(&date_key(date));
        let draft = saved
            .clone()
            .unwrap_or_else(|| Entry::draft(date, store.counter()));
        debug!(
            "Opened session for {} ({})",
            date,
            if saved.is_some() { "stored" } else { "new draft" }
        );
        DraftSession {
            date,
            draft,
            saved,
            dirty: false,
            last_modified: None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn draft(&self) -> &Entry {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The entry as last loaded from or saved to the store.
    pub fn saved(&self) -> Option<&Entry> {
        self.saved.as_ref()
    }

    /// Moves the session `offset_days` away from the current date.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the draft has unsaved changes or the
    /// target date is out of range. Save first, then navigate.
    pub fn navigate<B: StorageBackend>(
        &mut self,
        store: &EntryStore<B>,
        offset_days: i64,
    ) -> AppResult<()> {
        let target = shift(self.date, offset_days).ok_or_else(|| {
            AppError::Validation(format!("Cannot move {} days from {}", offset_days, self.date))
        })?;
        self.go_to(store, target)
    }

    /// Moves the session to `date`. Refuses while the draft is dirty.
    pub fn go_to<B: StorageBackend>(
        &mut self,
        store: &EntryStore<B>,
        date: NaiveDate,
    ) -> AppResult<()> {
        if self.dirty {
            return Err(AppError::Validation(format!(
                "Unsaved changes for {}; save them before switching dates",
                self.date
            )));
        }
        *self = DraftSession::open(store, date);
        Ok(())
    }

    /// Applies `edit` to the draft and marks it dirty as of `now`.
    pub fn modify<F>(&mut self, edit: F, now: Instant)
    where
        F: FnOnce(&mut Entry),
    {
        edit(&mut self.draft);
        self.touch(now);
    }

    fn touch(&mut self, now: Instant) {
        self.dirty = true;
        self.last_modified = Some(now);
    }

    /// Saves the draft if it is dirty and unchanged for the debounce window.
    ///
    /// Returns whether a save happened.
    pub fn flush_if_due<B: StorageBackend>(
        &mut self,
        store: &EntryStore<B>,
        now: Instant,
    ) -> AppResult<bool> {
        let Some(last) = self.last_modified else {
            return Ok(false);
        };
        if !self.dirty
            || now.saturating_duration_since(last) < Duration::from_millis(AUTOSAVE_DEBOUNCE_MS)
        {
            return Ok(false);
        }
        self.save(store)?;
        Ok(true)
    }

    /// Collects the draft and writes it under the session date.
    ///
    /// Derived fields are recomputed and meditation minutes are zeroed unless
    /// the status is `"Yes"`. The draft stays dirty if the write fails.
    pub fn save<B: StorageBackend>(&mut self, store: &EntryStore<B>) -> AppResult<()> {
        let key = date_key(self.date);
        self.draft.date = key.clone();
        self.draft.refresh_derived(store.counter());
        self.draft.mental_and_emotional_health.normalize_meditation();

        store.save(&key, &self.draft)?;
        self.saved = Some(self.draft.clone());
        self.dirty = false;
        self.last_modified = None;
        Ok(())
    }

    /// Copies `section` from the previous day's stored entry into the draft.
    ///
    /// Returns `false`, leaving the draft alone, if the previous day has no entry.
    pub fn carry_forward<B: StorageBackend>(
        &mut self,
        store: &EntryStore<B>,
        section: Section,
        now: Instant,
    ) -> bool {
        let Some(previous) = shift(self.date, -1).and_then(|d| store.get(&date_key(d))) else {
            debug!("No entry before {} to carry {} from", self.date, section);
            return false;
        };
        match section {
            Section::Environment => self.draft.environment = previous.environment,
            Section::PersonalCare => self.draft.personal_care = previous.personal_care,
        }
        self.touch(now);
        info!("Carried {} forward from {}", section, previous.date);
        true
    }

    /// Deletes the stored entry for the session date and restores defaults.
    pub fn reset<B: StorageBackend>(&mut self, store: &EntryStore<B>) -> AppResult<()> {
        store.delete(&date_key(self.date))?;
        self.draft = Entry::draft(self.date, store.counter());
        self.saved = None;
        self.dirty = false;
        self.last_modified = None;
        Ok(())
    }

    pub fn decisions(&self) -> &[Value] {
        &self.draft.decisions
    }

    pub fn add_decision(&mut self, decision: Value, now: Instant) {
        self.draft.decisions.push(decision);
        self.touch(now);
    }

    /// Replaces the decision at 1-based `position`.
    pub fn replace_decision(
        &mut self,
        position: usize,
        decision: Value,
        now: Instant,
    ) -> AppResult<()> {
        let index = self.decision_index(position)?;
        self.draft.decisions[index] = decision;
        self.touch(now);
        Ok(())
    }

    /// Removes and returns the decision at 1-based `position`.
    pub fn remove_decision(&mut self, position: usize, now: Instant) -> AppResult<Value> {
        let index = self.decision_index(position)?;
        let removed = self.draft.decisions.remove(index);
        self.touch(now);
        Ok(removed)
    }

    fn decision_index(&self, position: usize) -> AppResult<usize> {
        let len = self.draft.decisions.len();
        if position == 0 || position > len {
            return Err(AppError::Validation(format!(
                "No decision at position {} (have {})",
                position, len
            )));
        }
        Ok(position - 1)
    }
}

fn shift(date: NaiveDate, offset_days: i64) -> Option<NaiveDate> {
    let days = Days::new(offset_days.unsigned_abs());
    if offset_days >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
}
