//! Correcting journal entries for bank-originated discrepancies

use chrono::NaiveDate;

use crate::config::ReconciliationConfig;
use crate::types::*;
use crate::utils::validation::{validate_balanced_entries, validate_positive_amount};

/// Build the balanced pair of journal lines that brings the books in line
/// with the bank for one discrepancy
///
/// Posting rules:
/// - bank fee: debit the fee expense account, credit cash
/// - interest: debit cash, credit the interest income account
/// - NSF check: debit the receivable the check came from, credit cash
///
/// Both lines carry the discrepancy's reference and the given date so that a
/// later auto-match can pair the cash line with the originating bank line.
pub fn create_adjustment_entries(
    discrepancy: &ReconciliationDiscrepancy,
    date: NaiveDate,
    config: &ReconciliationConfig,
) -> ReconResult<Vec<JournalEntry>> {
    if !discrepancy.needs_adjustment {
        return Err(ReconError::AdjustmentNotRequired(discrepancy.id.clone()));
    }

    validate_positive_amount(&discrepancy.amount).map_err(|_| {
        ReconError::Validation(format!(
            "Adjustment amount must be positive for discrepancy '{}'",
            discrepancy.id
        ))
    })?;

    let cash = config.cash_account.clone();
    let accounts = &config.accounts;
    let (debit_account, credit_account, description) = match discrepancy.discrepancy_type {
        DiscrepancyType::BankFee => (
            accounts.bank_fee_expense.clone(),
            cash,
            format!("Bank fee: {}", discrepancy.description),
        ),
        DiscrepancyType::Interest => (
            cash,
            accounts.interest_income.clone(),
            format!("Interest earned: {}", discrepancy.description),
        ),
        DiscrepancyType::NsfCheck => (
            accounts.nsf_receivable.clone(),
            cash,
            format!("NSF check reversal: {}", discrepancy.description),
        ),
        kind @ (DiscrepancyType::OutstandingCheck
        | DiscrepancyType::DepositInTransit
        | DiscrepancyType::BankError
        | DiscrepancyType::BookError) => {
            return Err(ReconError::AdjustmentNotSupported(kind));
        }
    };

    let mut debit = JournalEntry::debit(
        new_id("adj"),
        date,
        debit_account,
        description.clone(),
        discrepancy.amount.clone(),
    );
    let mut credit = JournalEntry::credit(
        new_id("adj"),
        date,
        credit_account,
        description,
        discrepancy.amount.clone(),
    );
    debit.reference = discrepancy.reference.clone();
    credit.reference = discrepancy.reference.clone();

    let entries = vec![debit, credit];
    validate_balanced_entries(&entries, &config.tolerance)?;

    tracing::info!(
        discrepancy = %discrepancy.id,
        kind = %discrepancy.discrepancy_type,
        amount = %discrepancy.amount,
        "Created adjustment entries"
    );

    Ok(entries)
}

/// The cash-account line of an adjustment pair
pub fn cash_line<'a>(entries: &'a [JournalEntry], cash_account: &str) -> Option<&'a JournalEntry> {
    entries.iter().find(|e| e.is_for_account(cash_account))
}
