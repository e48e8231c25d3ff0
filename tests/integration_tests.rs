//! Integration tests for bookkeeping-recon

use bigdecimal::BigDecimal;
use bookkeeping_recon::{
    utils::{EnhancedJournalEntryValidator, MemoryJournal},
    BankEntryType, BankStatementEntry, DiscrepancyType, JournalEntry, JournalStore, MatchType,
    ReconError, Reconciler, ReconciliationConfig, ReconciliationEngine, ReconciliationSession,
    SessionStatus, DEFAULT_CASH_ACCOUNT,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn cash_debit(id: &str, day: u32, description: &str, amount: i32, reference: &str) -> JournalEntry {
    JournalEntry::debit(
        id.to_string(),
        date(day),
        DEFAULT_CASH_ACCOUNT.to_string(),
        description.to_string(),
        BigDecimal::from(amount),
    )
    .with_reference(reference)
}

fn cash_credit(id: &str, day: u32, description: &str, amount: i32, reference: &str) -> JournalEntry {
    JournalEntry::credit(
        id.to_string(),
        date(day),
        DEFAULT_CASH_ACCOUNT.to_string(),
        description.to_string(),
        BigDecimal::from(amount),
    )
    .with_reference(reference)
}

/// March 2024 cash activity.
///
/// Books: deposit 1,500 (matched), check 2001 for 800 (matched), check 2004
/// for 500 (outstanding), deposit 1,200 on the 31st (in transit).
/// Bank: the deposit, check 2001, a 35 service charge, 12 interest.
fn march_journal() -> Vec<JournalEntry> {
    vec![
        cash_debit("je-open", 1, "Opening balance", 10000, "OPEN"),
        cash_debit("je-dep1", 5, "Customer payment", 1500, "DEP001"),
        cash_credit("je-2001", 10, "Check #2001 - Rent", 800, "2001"),
        cash_credit("je-2004", 28, "Check #2004", 500, "2004"),
        cash_debit("je-dep2", 31, "Night deposit", 1200, "DEP002"),
        JournalEntry::debit(
            "je-rent".to_string(),
            date(10),
            "6000 - Rent Expense".to_string(),
            "Rent".to_string(),
            BigDecimal::from(800),
        ),
    ]
}

fn march_statement() -> Vec<BankStatementEntry> {
    vec![
        BankStatementEntry::deposit(
            "bk-1".to_string(),
            date(5),
            "Deposit".to_string(),
            BigDecimal::from(1500),
            BigDecimal::from(11500),
        )
        .with_reference("DEP001"),
        BankStatementEntry::withdrawal(
            "bk-2".to_string(),
            date(12),
            "Check 2001".to_string(),
            BigDecimal::from(800),
            BigDecimal::from(10700),
        )
        .with_reference("CHK 2001"),
        BankStatementEntry::withdrawal(
            "bk-3".to_string(),
            date(29),
            "Monthly service charge".to_string(),
            BigDecimal::from(35),
            BigDecimal::from(10665),
        )
        .with_type(BankEntryType::Fee),
        BankStatementEntry::deposit(
            "bk-4".to_string(),
            date(31),
            "Interest earned".to_string(),
            BigDecimal::from(12),
            BigDecimal::from(10677),
        )
        .with_type(BankEntryType::Interest),
    ]
}

fn march_session() -> ReconciliationSession {
    ReconciliationSession::new(
        "rec-2024-03".to_string(),
        date(31),
        march_statement(),
        BigDecimal::from(10000),
        BigDecimal::from(10677),
    )
}

fn reconciler_for(entries: Vec<JournalEntry>) -> Reconciler<MemoryJournal> {
    Reconciler::new(MemoryJournal::with_entries(entries), march_session())
}

#[test]
fn test_exact_deposit_match() {
    let engine = ReconciliationEngine::new();
    let matches = engine.auto_match_transactions(&march_statement(), &march_journal(), &[]);

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].bank_entry_id, "bk-1");
    assert_eq!(matches[0].journal_entry_id, "je-dep1");
    assert_eq!(matches[0].confidence, 100);
    assert_eq!(matches[0].match_type, MatchType::Exact);

    // Two days apart: 50 + 15 + 20
    assert_eq!(matches[1].bank_entry_id, "bk-2");
    assert_eq!(matches[1].journal_entry_id, "je-2001");
    assert_eq!(matches[1].confidence, 85);
    assert_eq!(matches[1].match_type, MatchType::Suggested);
}

#[test]
fn test_discrepancies_after_auto_match() {
    let engine = ReconciliationEngine::new();
    let bank = march_statement();
    let journal = march_journal();
    let matches = engine.auto_match_transactions(&bank, &journal, &[]);
    let discrepancies = engine.identify_discrepancies(&bank, &journal, &matches);

    let kinds: Vec<(DiscrepancyType, BigDecimal, bool)> = discrepancies
        .iter()
        .map(|d| (d.discrepancy_type, d.amount.clone(), d.needs_adjustment))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (DiscrepancyType::DepositInTransit, BigDecimal::from(10000), false),
            (DiscrepancyType::OutstandingCheck, BigDecimal::from(500), false),
            (DiscrepancyType::DepositInTransit, BigDecimal::from(1200), false),
            (DiscrepancyType::BankFee, BigDecimal::from(35), true),
            (DiscrepancyType::Interest, BigDecimal::from(12), true),
        ]
    );
}

#[test]
fn test_balanced_summary_without_discrepancies() {
    let engine = ReconciliationEngine::new();
    let summary = engine.calculate_reconciliation_summary(
        &BigDecimal::from(14300),
        &BigDecimal::from(14300),
        &[],
    );
    assert!(summary.is_balanced);
    assert_eq!(summary.difference, BigDecimal::from(0));
}

#[tokio::test]
async fn test_full_reconciliation_workflow() {
    // Opening balance of 9,300 in the books leaves them 1,377 short of the
    // bank before timing items and bank charges are accounted for.
    let mut entries = march_journal();
    entries.retain(|e| e.id != "je-open");
    entries.push(cash_debit("je-open", 1, "Opening balance", 9300, "OPEN"));
    let mut reconciler = reconciler_for(entries);

    let new_matches = reconciler.auto_match().await.unwrap();
    assert_eq!(new_matches.len(), 2);

    let session = reconciler.session();
    assert!(session.bank_statement_entries[0].is_cleared);
    assert!(session.bank_statement_entries[1].is_cleared);
    assert!(!session.bank_statement_entries[2].is_cleared);

    // book = 9300 + 1500 - 800 - 500 + 1200 = 10700
    let summary = reconciler.summary().await.unwrap();
    assert_eq!(summary.book_balance, BigDecimal::from(10700));
    assert_eq!(summary.bank_balance, BigDecimal::from(10677));
    assert_eq!(summary.outstanding_checks, BigDecimal::from(500));
    assert_eq!(summary.deposits_in_transit, BigDecimal::from(10500));
    assert_eq!(summary.bank_adjustments, BigDecimal::from(-23));
    assert_eq!(summary.adjusted_book_balance, summary.adjusted_bank_balance);
    assert!(summary.is_balanced);

    // Post the fee and interest corrections
    let fee_id = find_discrepancy(&reconciler, DiscrepancyType::BankFee);
    let fee_entries = reconciler.apply_adjustment(&fee_id).await.unwrap();
    assert_eq!(fee_entries.len(), 2);
    assert_eq!(fee_entries[0].account, "6100 - Bank Service Charges");
    assert_eq!(fee_entries[0].debit, BigDecimal::from(35));
    assert_eq!(fee_entries[1].account, DEFAULT_CASH_ACCOUNT);
    assert_eq!(fee_entries[1].credit, BigDecimal::from(35));
    assert!(reconciler.session().bank_statement_entries[2].is_cleared);

    let interest_id = find_discrepancy(&reconciler, DiscrepancyType::Interest);
    reconciler.apply_adjustment(&interest_id).await.unwrap();
    assert!(reconciler.session().bank_statement_entries[3].is_cleared);

    let remaining: Vec<DiscrepancyType> = reconciler
        .session()
        .discrepancies
        .iter()
        .map(|d| d.discrepancy_type)
        .collect();
    assert_eq!(
        remaining,
        vec![
            DiscrepancyType::OutstandingCheck,
            DiscrepancyType::DepositInTransit,
            DiscrepancyType::DepositInTransit,
        ]
    );

    // The corrections moved into the books: 10700 - 35 + 12
    let summary = reconciler.complete().await.unwrap();
    assert_eq!(summary.book_balance, BigDecimal::from(10677));
    assert_eq!(summary.bank_adjustments, BigDecimal::from(0));
    assert_eq!(summary.difference, BigDecimal::from(0));
    assert_eq!(reconciler.session().status, SessionStatus::Completed);

    reconciler.approve().unwrap();
    assert_eq!(reconciler.into_session().status, SessionStatus::Approved);
}

fn find_discrepancy(reconciler: &Reconciler<MemoryJournal>, kind: DiscrepancyType) -> String {
    reconciler
        .session()
        .discrepancies
        .iter()
        .find(|d| d.discrepancy_type == kind)
        .map(|d| d.id.clone())
        .unwrap()
}

#[tokio::test]
async fn test_session_lifecycle_when_balanced() {
    let statement = vec![BankStatementEntry::deposit(
        "bk-1".to_string(),
        date(5),
        "Deposit".to_string(),
        BigDecimal::from(1500),
        BigDecimal::from(1500),
    )
    .with_reference("DEP001")];
    let session = ReconciliationSession::new(
        "rec-1".to_string(),
        date(31),
        statement,
        BigDecimal::from(0),
        BigDecimal::from(1500),
    );
    let journal = MemoryJournal::with_entries(vec![cash_debit(
        "je-1", 5, "Customer payment", 1500, "DEP001",
    )]);
    let mut reconciler = Reconciler::new(journal, session);

    // Approval needs a completed session
    assert!(matches!(
        reconciler.approve(),
        Err(ReconError::InvalidStatusTransition { .. })
    ));

    // Unmatched, the statement deposit reads as a bank charge and the books
    // cannot be closed
    assert!(matches!(
        reconciler.complete().await,
        Err(ReconError::NotBalanced(_))
    ));
    assert_eq!(reconciler.session().status, SessionStatus::InProgress);

    reconciler.auto_match().await.unwrap();
    let summary = reconciler.complete().await.unwrap();
    assert!(summary.is_balanced);
    assert_eq!(reconciler.session().status, SessionStatus::Completed);

    // No more matching once completed
    assert!(reconciler.auto_match().await.is_err());

    reconciler.approve().unwrap();
    assert_eq!(reconciler.session().status, SessionStatus::Approved);
    assert!(reconciler.reopen().is_err());
}

#[tokio::test]
async fn test_manual_match_and_unmatch() {
    let mut reconciler = reconciler_for(march_journal());

    // Unknown IDs are rejected before anything changes
    assert!(matches!(
        reconciler.manual_match("bk-missing", "je-2004").await,
        Err(ReconError::BankEntryNotFound(_))
    ));
    assert!(matches!(
        reconciler.manual_match("bk-3", "je-missing").await,
        Err(ReconError::JournalEntryNotFound(_))
    ));
    assert!(matches!(
        reconciler.manual_match("bk-3", "je-rent").await,
        Err(ReconError::Validation(_))
    ));

    let manual = reconciler.manual_match("bk-2", "je-2004").await.unwrap();
    assert_eq!(manual.match_type, MatchType::Manual);
    assert_eq!(manual.confidence, 100);
    assert!(reconciler.session().bank_statement_entries[1].is_cleared);

    assert!(matches!(
        reconciler.manual_match("bk-2", "je-2001").await,
        Err(ReconError::BankEntryAlreadyMatched(_))
    ));
    assert!(matches!(
        reconciler.manual_match("bk-3", "je-2004").await,
        Err(ReconError::JournalEntryAlreadyMatched(_))
    ));
    assert_eq!(reconciler.session().matches.len(), 1);

    // Auto-match leaves the manual pair alone; check 2001 stays outstanding
    let auto = reconciler.auto_match().await.unwrap();
    assert_eq!(auto.len(), 1);
    assert_eq!(auto[0].bank_entry_id, "bk-1");

    let removed = reconciler.unmatch(&manual.id).await.unwrap();
    assert_eq!(removed.id, manual.id);
    assert!(!reconciler.session().bank_statement_entries[1].is_cleared);
    assert!(matches!(
        reconciler.unmatch(&manual.id).await,
        Err(ReconError::MatchNotFound(_))
    ));
}

#[tokio::test]
async fn test_adjustment_rejections() {
    let mut reconciler = reconciler_for(march_journal());
    reconciler.auto_match().await.unwrap();

    let outstanding = find_discrepancy(&reconciler, DiscrepancyType::OutstandingCheck);
    assert!(matches!(
        reconciler.apply_adjustment(&outstanding).await,
        Err(ReconError::AdjustmentNotRequired(_))
    ));
    assert!(matches!(
        reconciler.apply_adjustment("disc-nothing").await,
        Err(ReconError::DiscrepancyNotFound(_))
    ));
}

#[tokio::test]
async fn test_adjustment_clears_its_own_line_among_identical_fees() {
    let fee = |id: &str| {
        BankStatementEntry::withdrawal(
            id.to_string(),
            date(29),
            "Service charge".to_string(),
            BigDecimal::from(35),
            BigDecimal::from(0),
        )
        .with_type(BankEntryType::Fee)
    };
    let session = ReconciliationSession::new(
        "rec-fees".to_string(),
        date(31),
        vec![fee("bk-a"), fee("bk-b")],
        BigDecimal::from(0),
        BigDecimal::from(-70),
    );
    let mut reconciler = Reconciler::new(MemoryJournal::new(), session);
    reconciler.refresh_discrepancies().await.unwrap();

    // Adjust the second line first; the first identical line must stay open
    let entries = reconciler.apply_adjustment("disc-bk-b").await.unwrap();
    let session = reconciler.session();
    assert!(!session.bank_statement_entries[0].is_cleared);
    assert!(session.bank_statement_entries[1].is_cleared);
    let pairing = session
        .matches
        .iter()
        .find(|m| m.bank_entry_id == "bk-b")
        .unwrap();
    assert_eq!(pairing.journal_entry_id, entries[1].id);

    let open: Vec<(&str, bool)> = session
        .discrepancies
        .iter()
        .map(|d| {
            (
                d.source_entry_id.as_str(),
                d.adjustment_journal_entry_id.is_some(),
            )
        })
        .collect();
    assert_eq!(open, vec![("bk-a", false)]);

    reconciler.apply_adjustment("disc-bk-a").await.unwrap();
    let session = reconciler.session();
    assert!(session.bank_statement_entries.iter().all(|e| e.is_cleared));
    assert!(session.discrepancies.is_empty());

    let summary = reconciler.summary().await.unwrap();
    assert_eq!(summary.book_balance, BigDecimal::from(-70));
    assert!(summary.is_balanced);
}

#[tokio::test]
async fn test_adjustment_passes_enhanced_validation() {
    let journal = MemoryJournal::with_entries(march_journal());
    let mut reconciler = Reconciler::new(journal, march_session())
        .with_validator(Box::new(EnhancedJournalEntryValidator));
    reconciler.auto_match().await.unwrap();

    let fee = find_discrepancy(&reconciler, DiscrepancyType::BankFee);
    let entries = reconciler.apply_adjustment(&fee).await.unwrap();

    let stored = reconciler
        .storage()
        .list_account_entries("6100 - Bank Service Charges", None, None)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, entries[0].id);
    assert_eq!(stored[0].date, date(29));
}

#[test]
fn test_custom_config_changes_posting_accounts() {
    let config = ReconciliationConfig::from_toml_str(
        r#"
        [accounts]
        bank_fee_expense = "6150 - Bank Charges"
        "#,
    )
    .unwrap();
    let engine = ReconciliationEngine::with_config(config);

    let bank = march_statement();
    let discrepancies = engine.identify_discrepancies(&bank, &[], &[]);
    let fee = discrepancies
        .iter()
        .find(|d| d.source_entry_id == "bk-3")
        .unwrap();
    assert_eq!(fee.discrepancy_type, DiscrepancyType::BankFee);

    let entries = engine.create_adjustment_entries(fee, date(29)).unwrap();
    assert_eq!(entries[0].account, "6150 - Bank Charges");
}

#[test]
fn test_session_serializes_with_wire_names() {
    let session = march_session();
    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(json["status"], "in-progress");
    assert_eq!(json["bank_statement_entries"][2]["type"], "fee");
}
