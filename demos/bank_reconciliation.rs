//! Walk through a month-end bank reconciliation
//!
//! Run with `RUST_LOG=debug cargo run --example bank_reconciliation` to see
//! each match and classification as it happens.

use bigdecimal::BigDecimal;
use bookkeeping_recon::{
    format_currency, trial_balance, utils::MemoryJournal, BankEntryType, BankStatementEntry,
    JournalEntry, JournalStore, ReconResult, Reconciler, ReconciliationSession,
    DEFAULT_CASH_ACCOUNT,
};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap_or_default()
}

fn cash(id: &str, day: u32, description: &str, amount: i32, reference: &str) -> JournalEntry {
    let amount = BigDecimal::from(amount);
    let entry = if amount >= BigDecimal::from(0) {
        JournalEntry::debit(
            id.to_string(),
            march(day),
            DEFAULT_CASH_ACCOUNT.to_string(),
            description.to_string(),
            amount,
        )
    } else {
        JournalEntry::credit(
            id.to_string(),
            march(day),
            DEFAULT_CASH_ACCOUNT.to_string(),
            description.to_string(),
            amount.abs(),
        )
    };
    entry.with_reference(reference)
}

fn offset(id: &str, day: u32, account: &str, description: &str, debit: i32) -> JournalEntry {
    let amount = BigDecimal::from(debit);
    if amount >= BigDecimal::from(0) {
        JournalEntry::debit(
            id.to_string(),
            march(day),
            account.to_string(),
            description.to_string(),
            amount,
        )
    } else {
        JournalEntry::credit(
            id.to_string(),
            march(day),
            account.to_string(),
            description.to_string(),
            amount.abs(),
        )
    }
}

fn books() -> Vec<JournalEntry> {
    vec![
        cash("je-open", 1, "Opening balance", 9300, "OPEN"),
        offset("je-open-eq", 1, "3000 - Owner's Capital", "Opening balance", -9300),
        cash("je-dep1", 5, "Customer payment", 1500, "DEP001"),
        offset("je-dep1-ar", 5, "1200 - Accounts Receivable", "Customer payment", -1500),
        cash("je-2001", 10, "Check #2001 - Rent", -800, "2001"),
        offset("je-2001-rent", 10, "6000 - Rent Expense", "Check #2001 - Rent", 800),
        cash("je-2004", 28, "Check #2004 - Supplies", -500, "2004"),
        offset("je-2004-sup", 28, "6200 - Supplies Expense", "Check #2004 - Supplies", 500),
        cash("je-dep2", 31, "Night deposit", 1200, "DEP002"),
        offset("je-dep2-rev", 31, "4000 - Sales Revenue", "Night deposit", -1200),
    ]
}

fn statement() -> Vec<BankStatementEntry> {
    vec![
        BankStatementEntry::deposit(
            "bk-1".to_string(),
            march(5),
            "Deposit".to_string(),
            BigDecimal::from(1500),
            BigDecimal::from(11500),
        )
        .with_reference("DEP001"),
        BankStatementEntry::withdrawal(
            "bk-2".to_string(),
            march(12),
            "Check 2001".to_string(),
            BigDecimal::from(800),
            BigDecimal::from(10700),
        )
        .with_reference("CHK 2001"),
        BankStatementEntry::withdrawal(
            "bk-3".to_string(),
            march(29),
            "Monthly service charge".to_string(),
            BigDecimal::from(35),
            BigDecimal::from(10665),
        )
        .with_type(BankEntryType::Fee),
        BankStatementEntry::deposit(
            "bk-4".to_string(),
            march(31),
            "Interest earned".to_string(),
            BigDecimal::from(12),
            BigDecimal::from(10677),
        )
        .with_type(BankEntryType::Interest),
    ]
}

#[tokio::main]
async fn main() -> ReconResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let session = ReconciliationSession::new(
        "rec-2024-03".to_string(),
        march(31),
        statement(),
        BigDecimal::from(10000),
        BigDecimal::from(10677),
    );
    let mut reconciler = Reconciler::new(MemoryJournal::with_entries(books()), session);

    println!("=== Matching ===");
    for m in reconciler.auto_match().await? {
        println!(
            "{} <-> {}  {:?} ({}%)",
            m.bank_entry_id, m.journal_entry_id, m.match_type, m.confidence
        );
    }

    println!("\n=== Discrepancies ===");
    for d in &reconciler.session().discrepancies {
        println!(
            "{:<20} {:>12}  {}{}",
            d.discrepancy_type.label(),
            format_currency(&d.amount),
            d.description,
            if d.needs_adjustment { "  [needs entry]" } else { "" }
        );
    }

    let summary = reconciler.summary().await?;
    println!("\n=== Summary ===");
    println!("Book balance:          {:>12}", format_currency(&summary.book_balance));
    println!("Bank balance:          {:>12}", format_currency(&summary.bank_balance));
    println!("Outstanding checks:    {:>12}", format_currency(&summary.outstanding_checks));
    println!("Deposits in transit:   {:>12}", format_currency(&summary.deposits_in_transit));
    println!("Bank adjustments:      {:>12}", format_currency(&summary.bank_adjustments));
    println!("Adjusted book balance: {:>12}", format_currency(&summary.adjusted_book_balance));
    println!("Adjusted bank balance: {:>12}", format_currency(&summary.adjusted_bank_balance));
    println!("Balanced: {}", summary.is_balanced);

    println!("\n=== Adjustments ===");
    let pending: Vec<String> = reconciler
        .session()
        .discrepancies
        .iter()
        .filter(|d| d.needs_adjustment)
        .map(|d| d.id.clone())
        .collect();
    for id in pending {
        for entry in reconciler.apply_adjustment(&id).await? {
            println!(
                "{}  {:<32} Dr {:>10}  Cr {:>10}",
                entry.date,
                entry.account,
                format_currency(&entry.debit),
                format_currency(&entry.credit)
            );
        }
    }

    let summary = reconciler.complete().await?;
    reconciler.approve()?;
    println!(
        "\nReconciliation {} with book balance {}",
        reconciler.session().status,
        format_currency(&summary.book_balance)
    );

    let journal = reconciler.storage().list_entries(None, None).await?;
    let trial = trial_balance(&journal, march(31), &reconciler.engine().config().tolerance);
    println!("\n=== Trial Balance ===");
    for balance in trial.balances.values() {
        println!(
            "{:<32} {:>12} {:>12}",
            balance.account.label(),
            balance.debit_balance.as_ref().map(format_currency).unwrap_or_default(),
            balance.credit_balance.as_ref().map(format_currency).unwrap_or_default()
        );
    }
    println!(
        "{:<32} {:>12} {:>12}",
        "Totals",
        format_currency(&trial.total_debits),
        format_currency(&trial.total_credits)
    );

    Ok(())
}
