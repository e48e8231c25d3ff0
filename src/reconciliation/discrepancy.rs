//! Classification of whatever is left unmatched

use bigdecimal::BigDecimal;
use std::collections::HashSet;

use crate::types::*;

/// Derive discrepancies from the unmatched residue of both sides
///
/// The result is rebuilt from scratch on every call. Unmatched cash journal
/// credits become outstanding checks and unmatched debits become deposits in
/// transit; neither needs a correcting entry. Every unmatched bank line needs
/// one. Journal lines with neither side set produce nothing.
pub fn identify_discrepancies(
    bank_entries: &[BankStatementEntry],
    journal_entries: &[JournalEntry],
    matches: &[ReconciliationMatch],
    cash_account: &str,
) -> Vec<ReconciliationDiscrepancy> {
    let matched_bank: HashSet<&str> = matches.iter().map(|m| m.bank_entry_id.as_str()).collect();
    let matched_journal: HashSet<&str> = matches
        .iter()
        .map(|m| m.journal_entry_id.as_str())
        .collect();

    let mut discrepancies = Vec::new();
    let zero = BigDecimal::from(0);

    for entry in journal_entries
        .iter()
        .filter(|je| je.is_for_account(cash_account))
        .filter(|je| !matched_journal.contains(je.id.as_str()))
    {
        let discrepancy = if entry.credit > zero {
            ReconciliationDiscrepancy::new(
                DiscrepancyType::OutstandingCheck,
                entry.credit.clone(),
                entry.description.clone(),
                entry.reference.clone(),
                false,
                entry.id.clone(),
            )
        } else if entry.debit > zero {
            ReconciliationDiscrepancy::new(
                DiscrepancyType::DepositInTransit,
                entry.debit.clone(),
                entry.description.clone(),
                entry.reference.clone(),
                false,
                entry.id.clone(),
            )
        } else {
            tracing::warn!(journal_entry = %entry.id, "Skipping cash entry with no amount");
            continue;
        };

        tracing::debug!(
            source = %entry.id,
            kind = %discrepancy.discrepancy_type,
            amount = %discrepancy.amount,
            "Classified book discrepancy"
        );
        discrepancies.push(discrepancy);
    }

    for entry in bank_entries
        .iter()
        .filter(|be| !matched_bank.contains(be.id.as_str()))
    {
        let discrepancy_type = classify_bank_entry(entry);
        let amount = if entry.withdrawal > zero {
            entry.withdrawal.clone()
        } else {
            entry.deposit.clone()
        };

        tracing::debug!(
            source = %entry.id,
            kind = %discrepancy_type,
            amount = %amount,
            "Classified bank discrepancy"
        );
        discrepancies.push(ReconciliationDiscrepancy::new(
            discrepancy_type,
            amount,
            entry.description.clone(),
            entry.reference.clone(),
            true,
            entry.id.clone(),
        ));
    }

    discrepancies
}

/// Explain an unmatched bank line
pub fn classify_bank_entry(entry: &BankStatementEntry) -> DiscrepancyType {
    match entry.entry_type {
        BankEntryType::Fee => DiscrepancyType::BankFee,
        BankEntryType::Interest => DiscrepancyType::Interest,
        BankEntryType::Deposit | BankEntryType::Withdrawal => {
            let description = entry.description.to_lowercase();
            if description.contains("nsf") || description.contains("returned") {
                DiscrepancyType::NsfCheck
            } else {
                DiscrepancyType::BankFee
            }
        }
    }
}
