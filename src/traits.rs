//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::config::ReconciliationConfig;
use crate::types::*;

/// Storage abstraction for the general journal
///
/// Implementations must return entries in insertion order; the matcher's
/// first-fit behaviour depends on it.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Append entries to the journal
    async fn append_entries(&mut self, entries: &[JournalEntry]) -> ReconResult<()>;

    /// Get a journal entry by ID
    async fn get_entry(&self, entry_id: &str) -> ReconResult<Option<JournalEntry>>;

    /// List all entries within a date range
    async fn list_entries(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReconResult<Vec<JournalEntry>>;

    /// List entries posted to a specific account
    async fn list_account_entries(
        &self,
        account: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReconResult<Vec<JournalEntry>>;

    /// Delete a journal entry
    async fn delete_entry(&mut self, entry_id: &str) -> ReconResult<()>;
}

/// Trait for implementing journal entry validation rules
pub trait JournalEntryValidator: Send + Sync {
    /// Validate a single line before it is stored
    fn validate_entry(&self, entry: &JournalEntry) -> ReconResult<()>;

    /// Validate a group of lines posted together
    fn validate_batch(&self, entries: &[JournalEntry]) -> ReconResult<()> {
        for entry in entries {
            self.validate_entry(entry)?;
        }
        Ok(())
    }
}

/// Default validator: one positive side per line, identifiers present
pub struct DefaultJournalEntryValidator;

impl JournalEntryValidator for DefaultJournalEntryValidator {
    fn validate_entry(&self, entry: &JournalEntry) -> ReconResult<()> {
        if entry.id.trim().is_empty() {
            return Err(ReconError::Validation(
                "Journal entry ID cannot be empty".to_string(),
            ));
        }

        if entry.account.trim().is_empty() {
            return Err(ReconError::Validation(format!(
                "Journal entry '{}' has no account",
                entry.id
            )));
        }

        let zero = BigDecimal::from(0);
        if entry.debit < zero || entry.credit < zero {
            return Err(ReconError::Validation(format!(
                "Journal entry '{}' has a negative amount",
                entry.id
            )));
        }

        // Exactly one side carries the amount
        if (entry.debit > zero) == (entry.credit > zero) {
            return Err(ReconError::Validation(format!(
                "Journal entry '{}' must have exactly one of debit or credit",
                entry.id
            )));
        }

        Ok(())
    }
}

/// Strategy for pairing bank statement lines with journal lines
///
/// Strategies are pure: they read snapshots and return only the new matches.
/// Returned matches must never reuse a bank or journal ID that is already in
/// `existing` or in another returned match.
pub trait MatchStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Propose new matches for the unmatched lines
    fn find_matches(
        &self,
        bank_entries: &[BankStatementEntry],
        journal_entries: &[JournalEntry],
        existing: &[ReconciliationMatch],
        config: &ReconciliationConfig,
    ) -> Vec<ReconciliationMatch>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(debit: i32, credit: i32) -> JournalEntry {
        JournalEntry {
            id: "je1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            account: DEFAULT_CASH_ACCOUNT.to_string(),
            description: "Test".to_string(),
            debit: BigDecimal::from(debit),
            credit: BigDecimal::from(credit),
            reference: None,
        }
    }

    #[test]
    fn default_validator_accepts_one_sided_lines() {
        let validator = DefaultJournalEntryValidator;
        assert!(validator.validate_entry(&line(100, 0)).is_ok());
        assert!(validator.validate_entry(&line(0, 100)).is_ok());
    }

    #[test]
    fn default_validator_rejects_two_sided_and_empty_lines() {
        let validator = DefaultJournalEntryValidator;
        assert!(validator.validate_entry(&line(100, 100)).is_err());
        assert!(validator.validate_entry(&line(0, 0)).is_err());
        assert!(validator.validate_entry(&line(-5, 0)).is_err());
    }
}
