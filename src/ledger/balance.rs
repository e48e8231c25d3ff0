//! Account balances and running-balance ledger views

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Book balance of the cash account: the sum of `debit - credit` over its lines
///
/// Order of the input does not matter; an empty journal yields zero.
pub fn calculate_book_balance(journal_entries: &[JournalEntry], cash_account: &str) -> BigDecimal {
    journal_entries
        .iter()
        .filter(|e| e.is_for_account(cash_account))
        .map(JournalEntry::net_debit)
        .sum()
}

/// One row in a general-ledger view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub entry: JournalEntry,
    /// Debit-minus-credit balance after this line
    pub running_balance: BigDecimal,
}

/// Lines posted to an account, sorted by date, with a running balance
///
/// Lines on the same date keep their journal order.
pub fn account_ledger(journal_entries: &[JournalEntry], account: &str) -> Vec<LedgerLine> {
    let mut lines: Vec<&JournalEntry> = journal_entries
        .iter()
        .filter(|e| e.is_for_account(account))
        .collect();
    lines.sort_by_key(|e| e.date);

    let mut balance = BigDecimal::from(0);
    lines
        .into_iter()
        .map(|entry| {
            balance += entry.net_debit();
            LedgerLine {
                entry: entry.clone(),
                running_balance: balance.clone(),
            }
        })
        .collect()
}
