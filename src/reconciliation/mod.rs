//! Bank reconciliation engine
//!
//! Pairs bank statement lines with cash-account journal lines, explains
//! whatever is left unmatched, and proves that book and bank balances agree
//! once those items are taken into account. Everything here works on
//! snapshots and returns new values; the [`Reconciler`] is the stateful
//! workflow built on top.

pub mod adjustment;
pub mod discrepancy;
pub mod matcher;
pub mod summary;
pub mod workspace;

pub use adjustment::*;
pub use discrepancy::*;
pub use matcher::*;
pub use summary::*;
pub use workspace::*;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::config::ReconciliationConfig;
use crate::ledger::balance;
use crate::traits::MatchStrategy;
use crate::types::*;

/// Configured entry point to the reconciliation operations
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
    strategy: Box<dyn MatchStrategy>,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationEngine {
    /// Create an engine with default settings and the greedy matcher
    pub fn new() -> Self {
        Self::with_config(ReconciliationConfig::default())
    }

    /// Create an engine with custom settings
    pub fn with_config(config: ReconciliationConfig) -> Self {
        Self {
            config,
            strategy: Box::new(GreedyThresholdMatcher),
        }
    }

    /// Create an engine with custom settings and matching strategy
    pub fn with_strategy(config: ReconciliationConfig, strategy: Box<dyn MatchStrategy>) -> Self {
        Self { config, strategy }
    }

    /// Active configuration
    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Name of the matching strategy in use
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Book balance of the configured cash account
    pub fn calculate_book_balance(&self, journal_entries: &[JournalEntry]) -> BigDecimal {
        balance::calculate_book_balance(journal_entries, &self.config.cash_account)
    }

    /// New matches for lines not covered by `existing_matches`
    pub fn auto_match_transactions(
        &self,
        bank_entries: &[BankStatementEntry],
        journal_entries: &[JournalEntry],
        existing_matches: &[ReconciliationMatch],
    ) -> Vec<ReconciliationMatch> {
        auto_match_transactions(
            self.strategy.as_ref(),
            bank_entries,
            journal_entries,
            existing_matches,
            &self.config,
        )
    }

    /// User-chosen match; fails if either side is already matched
    pub fn add_manual_match(
        &self,
        existing_matches: &[ReconciliationMatch],
        bank_entry_id: &str,
        journal_entry_id: &str,
    ) -> ReconResult<ReconciliationMatch> {
        add_manual_match(existing_matches, bank_entry_id, journal_entry_id)
    }

    /// Remove a match; returns the remaining set and the removed match
    pub fn remove_match(
        &self,
        matches: &[ReconciliationMatch],
        match_id: &str,
    ) -> ReconResult<(Vec<ReconciliationMatch>, ReconciliationMatch)> {
        remove_match(matches, match_id)
    }

    /// Recompute `is_cleared` from match membership
    pub fn refresh_cleared_flags(
        &self,
        bank_entries: &mut [BankStatementEntry],
        matches: &[ReconciliationMatch],
    ) {
        refresh_cleared_flags(bank_entries, matches)
    }

    /// Classify the unmatched residue
    pub fn identify_discrepancies(
        &self,
        bank_entries: &[BankStatementEntry],
        journal_entries: &[JournalEntry],
        matches: &[ReconciliationMatch],
    ) -> Vec<ReconciliationDiscrepancy> {
        identify_discrepancies(
            bank_entries,
            journal_entries,
            matches,
            &self.config.cash_account,
        )
    }

    /// Adjusted-balance proof
    pub fn calculate_reconciliation_summary(
        &self,
        book_balance: &BigDecimal,
        bank_statement_balance: &BigDecimal,
        discrepancies: &[ReconciliationDiscrepancy],
    ) -> ReconciliationSummary {
        calculate_reconciliation_summary(
            book_balance,
            bank_statement_balance,
            discrepancies,
            &self.config.tolerance,
        )
    }

    /// Balanced correcting entries for a discrepancy that needs adjustment
    pub fn create_adjustment_entries(
        &self,
        discrepancy: &ReconciliationDiscrepancy,
        date: NaiveDate,
    ) -> ReconResult<Vec<JournalEntry>> {
        create_adjustment_entries(discrepancy, date, &self.config)
    }
}
