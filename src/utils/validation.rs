//! Validation utilities

use bigdecimal::BigDecimal;

use crate::ledger::account::Account;
use crate::traits::*;
use crate::types::*;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> ReconResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(ReconError::Validation("Amount must be positive".to_string()))
    } else {
        Ok(())
    }
}

/// Validate that an account string has the `"<code> - <name>"` shape
pub fn validate_account_label(account: &str) -> ReconResult<()> {
    if account.trim().is_empty() {
        return Err(ReconError::Validation(
            "Account cannot be empty".to_string(),
        ));
    }

    if account.len() > 100 {
        return Err(ReconError::Validation(
            "Account cannot exceed 100 characters".to_string(),
        ));
    }

    if Account::parse(account).is_none() {
        return Err(ReconError::Validation(format!(
            "Account '{}' must look like '<code> - <name>'",
            account
        )));
    }

    Ok(())
}

/// Validate that a journal description is valid
pub fn validate_description(description: &str) -> ReconResult<()> {
    if description.trim().is_empty() {
        return Err(ReconError::Validation(
            "Journal entry description cannot be empty".to_string(),
        ));
    }

    if description.len() > 500 {
        return Err(ReconError::Validation(
            "Journal entry description cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a group of lines balances (total debits = total credits)
pub fn validate_balanced_entries(
    entries: &[JournalEntry],
    tolerance: &BigDecimal,
) -> ReconResult<()> {
    if entries.len() < 2 {
        return Err(ReconError::Validation(
            "A posting needs at least two lines for double-entry bookkeeping".to_string(),
        ));
    }

    let total_debits: BigDecimal = entries.iter().map(|e| &e.debit).sum();
    let total_credits: BigDecimal = entries.iter().map(|e| &e.credit).sum();

    if (&total_debits - &total_credits).abs() >= *tolerance {
        return Err(ReconError::Validation(format!(
            "Entries are not balanced: debits = {}, credits = {}",
            total_debits, total_credits
        )));
    }

    Ok(())
}

/// Enhanced validator that also checks account shape and description
pub struct EnhancedJournalEntryValidator;

impl JournalEntryValidator for EnhancedJournalEntryValidator {
    fn validate_entry(&self, entry: &JournalEntry) -> ReconResult<()> {
        // Basic validation
        DefaultJournalEntryValidator.validate_entry(entry)?;

        validate_account_label(&entry.account)?;
        validate_description(&entry.description)?;

        Ok(())
    }

    fn validate_batch(&self, entries: &[JournalEntry]) -> ReconResult<()> {
        let mut seen = std::collections::HashSet::new();
        for entry in entries {
            self.validate_entry(entry)?;
            if !seen.insert(entry.id.as_str()) {
                return Err(ReconError::Validation(format!(
                    "Journal entry '{}' appears more than once in the batch",
                    entry.id
                )));
            }
        }
        Ok(())
    }
}
