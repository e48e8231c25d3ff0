//! Pairing of bank statement lines with cash-account journal lines

use bigdecimal::BigDecimal;
use std::collections::HashSet;

use crate::config::ReconciliationConfig;
use crate::traits::MatchStrategy;
use crate::types::*;

/// Greedy first-fit matcher
///
/// Bank lines are visited in input order and, for each, journal lines are
/// visited in input order. The first journal line whose score reaches the
/// threshold is taken, even if a later candidate would score higher. Which
/// pair wins among several qualifying candidates is part of the observable
/// behaviour, so an optimal assignment belongs in a separate strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyThresholdMatcher;

impl MatchStrategy for GreedyThresholdMatcher {
    fn name(&self) -> &'static str {
        "greedy-threshold"
    }

    fn find_matches(
        &self,
        bank_entries: &[BankStatementEntry],
        journal_entries: &[JournalEntry],
        existing: &[ReconciliationMatch],
        config: &ReconciliationConfig,
    ) -> Vec<ReconciliationMatch> {
        let mut used_bank: HashSet<&str> =
            existing.iter().map(|m| m.bank_entry_id.as_str()).collect();
        let mut used_journal: HashSet<&str> = existing
            .iter()
            .map(|m| m.journal_entry_id.as_str())
            .collect();

        let candidates: Vec<&JournalEntry> = journal_entries
            .iter()
            .filter(|je| je.is_for_account(&config.cash_account))
            .filter(|je| !used_journal.contains(je.id.as_str()))
            .collect();

        let mut new_matches = Vec::new();

        for bank_entry in bank_entries {
            if used_bank.contains(bank_entry.id.as_str()) {
                continue;
            }

            for journal_entry in &candidates {
                if used_journal.contains(journal_entry.id.as_str()) {
                    continue;
                }

                let confidence = score_pair(bank_entry, journal_entry, config);
                if confidence < config.match_threshold {
                    continue;
                }

                let match_type = if confidence >= 100 {
                    MatchType::Exact
                } else {
                    MatchType::Suggested
                };

                tracing::debug!(
                    bank_entry = %bank_entry.id,
                    journal_entry = %journal_entry.id,
                    confidence,
                    ?match_type,
                    "Matched transaction"
                );

                used_bank.insert(bank_entry.id.as_str());
                used_journal.insert(journal_entry.id.as_str());
                new_matches.push(ReconciliationMatch::new(
                    bank_entry.id.clone(),
                    journal_entry.id.clone(),
                    match_type,
                    confidence,
                ));
                break;
            }
        }

        new_matches
    }
}

/// Score how likely a journal line records the same movement as a bank line
pub fn score_pair(
    bank_entry: &BankStatementEntry,
    journal_entry: &JournalEntry,
    config: &ReconciliationConfig,
) -> u8 {
    let scoring = &config.scoring;
    let mut confidence: u32 = 0;

    // A deposit on the statement is a debit to cash in the books
    let journal_amount: &BigDecimal = if bank_entry.is_deposit() {
        &journal_entry.debit
    } else {
        &journal_entry.credit
    };
    if config.amounts_equal(bank_entry.amount(), journal_amount) {
        confidence += u32::from(scoring.amount_match);
    }

    let days_apart = bank_entry
        .date
        .signed_duration_since(journal_entry.date)
        .num_days()
        .abs();
    if days_apart <= scoring.date_close_days {
        confidence += u32::from(scoring.date_close);
    } else if days_apart <= scoring.date_near_days {
        confidence += u32::from(scoring.date_near);
    }

    if reference_contains(bank_entry.reference.as_deref(), journal_entry.reference.as_deref()) {
        confidence += u32::from(scoring.reference_match);
    }

    confidence.min(100) as u8
}

/// Case-insensitive check that the bank reference contains the journal reference
///
/// A missing reference on either side never matches. An empty journal
/// reference is contained in any present bank reference.
fn reference_contains(bank_reference: Option<&str>, journal_reference: Option<&str>) -> bool {
    match (bank_reference, journal_reference) {
        (Some(bank), Some(journal)) => bank
            .to_lowercase()
            .contains(journal.to_lowercase().as_str()),
        _ => false,
    }
}

/// Run a strategy and return only the matches it adds
pub fn auto_match_transactions(
    strategy: &dyn MatchStrategy,
    bank_entries: &[BankStatementEntry],
    journal_entries: &[JournalEntry],
    existing_matches: &[ReconciliationMatch],
    config: &ReconciliationConfig,
) -> Vec<ReconciliationMatch> {
    let new_matches =
        strategy.find_matches(bank_entries, journal_entries, existing_matches, config);
    tracing::debug!(
        strategy = strategy.name(),
        new_matches = new_matches.len(),
        "Auto-match finished"
    );
    new_matches
}

/// Create a user-chosen match, rejecting IDs that are already paired
pub fn add_manual_match(
    existing_matches: &[ReconciliationMatch],
    bank_entry_id: &str,
    journal_entry_id: &str,
) -> ReconResult<ReconciliationMatch> {
    if existing_matches
        .iter()
        .any(|m| m.bank_entry_id == bank_entry_id)
    {
        tracing::warn!(bank_entry = bank_entry_id, "Rejected manual match");
        return Err(ReconError::BankEntryAlreadyMatched(
            bank_entry_id.to_string(),
        ));
    }

    if existing_matches
        .iter()
        .any(|m| m.journal_entry_id == journal_entry_id)
    {
        tracing::warn!(journal_entry = journal_entry_id, "Rejected manual match");
        return Err(ReconError::JournalEntryAlreadyMatched(
            journal_entry_id.to_string(),
        ));
    }

    Ok(ReconciliationMatch::new(
        bank_entry_id.to_string(),
        journal_entry_id.to_string(),
        MatchType::Manual,
        100,
    ))
}

/// Remove a match by ID, returning the remaining matches and the removed one
pub fn remove_match(
    matches: &[ReconciliationMatch],
    match_id: &str,
) -> ReconResult<(Vec<ReconciliationMatch>, ReconciliationMatch)> {
    let position = matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or_else(|| ReconError::MatchNotFound(match_id.to_string()))?;

    let mut remaining = matches.to_vec();
    let removed = remaining.remove(position);
    Ok((remaining, removed))
}

/// Recompute `is_cleared` on every statement line from match membership
pub fn refresh_cleared_flags(
    bank_entries: &mut [BankStatementEntry],
    matches: &[ReconciliationMatch],
) {
    let matched: HashSet<&str> = matches.iter().map(|m| m.bank_entry_id.as_str()).collect();
    for entry in bank_entries.iter_mut() {
        entry.is_cleared = matched.contains(entry.id.as_str());
    }
}
