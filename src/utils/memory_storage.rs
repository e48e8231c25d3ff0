//! In-memory journal implementation for testing

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

/// In-memory journal for testing and development
///
/// Entries are kept in insertion order. Appended entries are checked by the
/// journal's validator; preloaded entries are taken as given.
#[derive(Clone)]
pub struct MemoryJournal {
    entries: Arc<RwLock<Vec<JournalEntry>>>,
    validator: Arc<dyn JournalEntryValidator>,
}

impl MemoryJournal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    /// Create a journal preloaded with entries
    pub fn with_entries(entries: Vec<JournalEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
            validator: Arc::new(DefaultJournalEntryValidator),
        }
    }

    /// Replace the validator applied on append
    pub fn with_validator(mut self, validator: Arc<dyn JournalEntryValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Number of stored entries
    pub fn len(&self) -> ReconResult<usize> {
        Ok(self.read()?.len())
    }

    /// Whether the journal holds no entries
    pub fn is_empty(&self) -> ReconResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> ReconResult<()> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> ReconResult<RwLockReadGuard<'_, Vec<JournalEntry>>> {
        self.entries
            .read()
            .map_err(|e| ReconError::Storage(format!("journal lock poisoned: {}", e)))
    }

    fn write(&self) -> ReconResult<RwLockWriteGuard<'_, Vec<JournalEntry>>> {
        self.entries
            .write()
            .map_err(|e| ReconError::Storage(format!("journal lock poisoned: {}", e)))
    }
}

impl Default for MemoryJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryJournal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryJournal")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

fn in_range(date: NaiveDate, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> bool {
    if let Some(start) = start_date {
        if date < start {
            return false;
        }
    }
    if let Some(end) = end_date {
        if date > end {
            return false;
        }
    }
    true
}

#[async_trait]
impl JournalStore for MemoryJournal {
    async fn append_entries(&mut self, entries: &[JournalEntry]) -> ReconResult<()> {
        self.validator.validate_batch(entries)?;
        let mut stored = self.write()?;

        // All-or-nothing on duplicate IDs
        let mut batch_ids = HashSet::new();
        for entry in entries {
            if !batch_ids.insert(entry.id.as_str()) || stored.iter().any(|e| e.id == entry.id) {
                return Err(ReconError::Storage(format!(
                    "Journal entry '{}' already exists",
                    entry.id
                )));
            }
        }

        stored.extend_from_slice(entries);
        Ok(())
    }

    async fn get_entry(&self, entry_id: &str) -> ReconResult<Option<JournalEntry>> {
        Ok(self.read()?.iter().find(|e| e.id == entry_id).cloned())
    }

    async fn list_entries(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReconResult<Vec<JournalEntry>> {
        Ok(self
            .read()?
            .iter()
            .filter(|e| in_range(e.date, start_date, end_date))
            .cloned()
            .collect())
    }

    async fn list_account_entries(
        &self,
        account: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReconResult<Vec<JournalEntry>> {
        Ok(self
            .read()?
            .iter()
            .filter(|e| e.is_for_account(account))
            .filter(|e| in_range(e.date, start_date, end_date))
            .cloned()
            .collect())
    }

    async fn delete_entry(&mut self, entry_id: &str) -> ReconResult<()> {
        let mut stored = self.write()?;
        match stored.iter().position(|e| e.id == entry_id) {
            Some(index) => {
                stored.remove(index);
                Ok(())
            }
            None => Err(ReconError::JournalEntryNotFound(entry_id.to_string())),
        }
    }
}
