//! Adjusted-balance proof

use bigdecimal::BigDecimal;

use crate::types::*;

/// Fold discrepancies into adjusted book and bank balances
///
/// Both sides receive the same timing items:
///
/// ```text
/// adjusted_book = book + deposits_in_transit - outstanding_checks + bank_adjustments
/// adjusted_bank = bank + deposits_in_transit - outstanding_checks + book_adjustments
/// ```
///
/// Bank and book error items are informational and are not folded.
/// `book_adjustments` stays zero here; callers fill it for book-side corrections.
pub fn calculate_reconciliation_summary(
    book_balance: &BigDecimal,
    bank_statement_balance: &BigDecimal,
    discrepancies: &[ReconciliationDiscrepancy],
    tolerance: &BigDecimal,
) -> ReconciliationSummary {
    let mut outstanding_checks = BigDecimal::from(0);
    let mut deposits_in_transit = BigDecimal::from(0);
    let mut bank_adjustments = BigDecimal::from(0);
    let book_adjustments = BigDecimal::from(0);

    for discrepancy in discrepancies {
        match discrepancy.discrepancy_type {
            DiscrepancyType::OutstandingCheck => outstanding_checks += &discrepancy.amount,
            DiscrepancyType::DepositInTransit => deposits_in_transit += &discrepancy.amount,
            DiscrepancyType::BankFee | DiscrepancyType::NsfCheck => {
                bank_adjustments -= &discrepancy.amount
            }
            DiscrepancyType::Interest => bank_adjustments += &discrepancy.amount,
            DiscrepancyType::BankError | DiscrepancyType::BookError => {}
        }
    }

    let adjusted_book_balance =
        book_balance + &deposits_in_transit - &outstanding_checks + &bank_adjustments;
    let adjusted_bank_balance =
        bank_statement_balance + &deposits_in_transit - &outstanding_checks + &book_adjustments;
    let difference = (&adjusted_book_balance - &adjusted_bank_balance).abs();
    let is_balanced = &difference < tolerance;

    tracing::info!(
        book = %book_balance,
        bank = %bank_statement_balance,
        difference = %difference,
        is_balanced,
        "Reconciliation summary"
    );

    ReconciliationSummary {
        book_balance: book_balance.clone(),
        bank_balance: bank_statement_balance.clone(),
        outstanding_checks,
        deposits_in_transit,
        bank_adjustments,
        book_adjustments,
        adjusted_book_balance,
        adjusted_bank_balance,
        difference,
        is_balanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tolerance() -> BigDecimal {
        BigDecimal::new(1.into(), 2)
    }

    fn item(kind: DiscrepancyType, amount: i32) -> ReconciliationDiscrepancy {
        ReconciliationDiscrepancy::new(
            kind,
            BigDecimal::from(amount),
            kind.label().to_string(),
            None,
            false,
            "src".to_string(),
        )
    }

    #[test]
    fn equal_balances_without_items_are_balanced() {
        let summary = calculate_reconciliation_summary(
            &BigDecimal::from(14300),
            &BigDecimal::from(14300),
            &[],
            &tolerance(),
        );
        assert!(summary.is_balanced);
        assert_eq!(summary.difference, BigDecimal::from(0));
        assert_eq!(summary.adjusted_book_balance, BigDecimal::from(14300));
        assert_eq!(summary.adjusted_bank_balance, BigDecimal::from(14300));
    }

    #[test]
    fn folds_each_discrepancy_kind() {
        let items = vec![
            item(DiscrepancyType::OutstandingCheck, 500),
            item(DiscrepancyType::OutstandingCheck, 250),
            item(DiscrepancyType::DepositInTransit, 1200),
            item(DiscrepancyType::BankFee, 35),
            item(DiscrepancyType::NsfCheck, 450),
            item(DiscrepancyType::Interest, 12),
            item(DiscrepancyType::BankError, 999),
            item(DiscrepancyType::BookError, 999),
        ];

        let summary = calculate_reconciliation_summary(
            &BigDecimal::from(10000),
            &BigDecimal::from(9527),
            &items,
            &tolerance(),
        );

        assert_eq!(summary.outstanding_checks, BigDecimal::from(750));
        assert_eq!(summary.deposits_in_transit, BigDecimal::from(1200));
        assert_eq!(summary.bank_adjustments, BigDecimal::from(-473));
        assert_eq!(summary.book_adjustments, BigDecimal::from(0));
        assert_eq!(summary.adjusted_book_balance, BigDecimal::from(9977));
        assert_eq!(summary.adjusted_bank_balance, BigDecimal::from(9977));
        assert!(summary.is_balanced);
    }

    #[test]
    fn gap_within_tolerance_still_balances() {
        let book = BigDecimal::from(100);
        let bank = &book + BigDecimal::new(5.into(), 3);
        let summary = calculate_reconciliation_summary(&book, &bank, &[], &tolerance());
        assert!(summary.is_balanced);

        let bank = &book + BigDecimal::new(1.into(), 2);
        let summary = calculate_reconciliation_summary(&book, &bank, &[], &tolerance());
        assert!(!summary.is_balanced);
    }
}
