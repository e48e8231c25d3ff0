//! Core types and data structures for bank reconciliation

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cash account that participates in reconciliation unless configured otherwise
pub const DEFAULT_CASH_ACCOUNT: &str = "1011 - Cash";

/// Generate a prefixed unique identifier
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// A single line in the general journal
///
/// Each line posts to exactly one account; exactly one of `debit` and
/// `credit` is expected to be nonzero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for the journal line
    pub id: String,
    /// Posting date
    pub date: NaiveDate,
    /// Account in `"<code> - <name>"` form, e.g. `"1011 - Cash"`
    pub account: String,
    /// Narrative for the line
    pub description: String,
    /// Debit amount (zero when this is a credit line)
    pub debit: BigDecimal,
    /// Credit amount (zero when this is a debit line)
    pub credit: BigDecimal,
    /// Optional reference number (check number, deposit slip, etc.)
    pub reference: Option<String>,
}

impl JournalEntry {
    /// Create a debit line
    pub fn debit(
        id: String,
        date: NaiveDate,
        account: String,
        description: String,
        amount: BigDecimal,
    ) -> Self {
        Self {
            id,
            date,
            account,
            description,
            debit: amount,
            credit: BigDecimal::from(0),
            reference: None,
        }
    }

    /// Create a credit line
    pub fn credit(
        id: String,
        date: NaiveDate,
        account: String,
        description: String,
        amount: BigDecimal,
    ) -> Self {
        Self {
            id,
            date,
            account,
            description,
            debit: BigDecimal::from(0),
            credit: amount,
            reference: None,
        }
    }

    /// Attach a reference number
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Net effect on a debit-normal account (`debit - credit`)
    pub fn net_debit(&self) -> BigDecimal {
        &self.debit - &self.credit
    }

    /// Whether this line posts to the given account
    pub fn is_for_account(&self, account: &str) -> bool {
        self.account == account
    }
}

/// Kind of bank statement line as reported by the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankEntryType {
    Deposit,
    Withdrawal,
    Fee,
    Interest,
}

/// A line on the bank statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankStatementEntry {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub reference: Option<String>,
    pub withdrawal: BigDecimal,
    pub deposit: BigDecimal,
    /// Bank's running balance after this line, as printed on the statement
    pub balance: BigDecimal,
    #[serde(rename = "type")]
    pub entry_type: BankEntryType,
    /// Set once a match references this line
    pub is_cleared: bool,
}

impl BankStatementEntry {
    /// Create a money-in statement line
    pub fn deposit(
        id: String,
        date: NaiveDate,
        description: String,
        amount: BigDecimal,
        balance: BigDecimal,
    ) -> Self {
        Self {
            id,
            date,
            description,
            reference: None,
            withdrawal: BigDecimal::from(0),
            deposit: amount,
            balance,
            entry_type: BankEntryType::Deposit,
            is_cleared: false,
        }
    }

    /// Create a money-out statement line
    pub fn withdrawal(
        id: String,
        date: NaiveDate,
        description: String,
        amount: BigDecimal,
        balance: BigDecimal,
    ) -> Self {
        Self {
            id,
            date,
            description,
            reference: None,
            withdrawal: amount,
            deposit: BigDecimal::from(0),
            balance,
            entry_type: BankEntryType::Withdrawal,
            is_cleared: false,
        }
    }

    /// Attach a reference number
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Override the bank's classification of this line
    pub fn with_type(mut self, entry_type: BankEntryType) -> Self {
        self.entry_type = entry_type;
        self
    }

    /// True when money came into the account on this line
    pub fn is_deposit(&self) -> bool {
        self.deposit > BigDecimal::from(0)
    }

    /// Magnitude of the line: the deposit if positive, otherwise the withdrawal
    pub fn amount(&self) -> &BigDecimal {
        if self.is_deposit() {
            &self.deposit
        } else {
            &self.withdrawal
        }
    }
}

/// How a match was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Automatic match that scored full confidence
    Exact,
    /// Pair chosen by the user
    Manual,
    /// Automatic match above threshold but below full confidence
    Suggested,
}

/// A 1:1 pairing of a bank statement line with a journal line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationMatch {
    pub id: String,
    pub bank_entry_id: String,
    pub journal_entry_id: String,
    pub match_date: NaiveDateTime,
    pub match_type: MatchType,
    /// Score in the range 0..=100
    pub confidence: u8,
}

impl ReconciliationMatch {
    /// Create a match stamped with the current time
    pub fn new(
        bank_entry_id: String,
        journal_entry_id: String,
        match_type: MatchType,
        confidence: u8,
    ) -> Self {
        Self {
            id: new_id("match"),
            bank_entry_id,
            journal_entry_id,
            match_date: chrono::Utc::now().naive_utc(),
            match_type,
            confidence: confidence.min(100),
        }
    }
}

/// Reason a transaction is left unmatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyType {
    /// Book-recorded disbursement the bank has not cleared yet
    OutstandingCheck,
    /// Book-recorded deposit the bank has not reflected yet
    DepositInTransit,
    BankError,
    BookError,
    BankFee,
    /// Customer check returned for insufficient funds
    NsfCheck,
    Interest,
}

impl DiscrepancyType {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DiscrepancyType::OutstandingCheck => "Outstanding check",
            DiscrepancyType::DepositInTransit => "Deposit in transit",
            DiscrepancyType::BankError => "Bank error",
            DiscrepancyType::BookError => "Book error",
            DiscrepancyType::BankFee => "Bank fee",
            DiscrepancyType::NsfCheck => "NSF check",
            DiscrepancyType::Interest => "Interest",
        }
    }
}

impl fmt::Display for DiscrepancyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unmatched item explaining part of the gap between book and bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationDiscrepancy {
    pub id: String,
    #[serde(rename = "type")]
    pub discrepancy_type: DiscrepancyType,
    /// Positive magnitude of the item
    pub amount: BigDecimal,
    pub description: String,
    pub reference: Option<String>,
    /// True when the books must record a correcting entry
    pub needs_adjustment: bool,
    /// Journal entry created to resolve this item, once applied
    pub adjustment_journal_entry_id: Option<String>,
    /// Bank line or journal line this item was derived from
    pub source_entry_id: String,
}

impl ReconciliationDiscrepancy {
    /// Create a new discrepancy record
    ///
    /// The ID is derived from the source line, so recomputing discrepancies
    /// for the same residue yields the same IDs.
    pub fn new(
        discrepancy_type: DiscrepancyType,
        amount: BigDecimal,
        description: String,
        reference: Option<String>,
        needs_adjustment: bool,
        source_entry_id: String,
    ) -> Self {
        Self {
            id: format!("disc-{}", source_entry_id),
            discrepancy_type,
            amount,
            description,
            reference,
            needs_adjustment,
            adjustment_journal_entry_id: None,
            source_entry_id,
        }
    }
}

/// Lifecycle of a reconciliation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Approved,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::InProgress => write!(f, "in-progress"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Approved => write!(f, "approved"),
        }
    }
}

/// One statement period's reconciliation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSession {
    pub id: String,
    pub statement_date: NaiveDate,
    pub bank_statement_entries: Vec<BankStatementEntry>,
    pub matches: Vec<ReconciliationMatch>,
    pub discrepancies: Vec<ReconciliationDiscrepancy>,
    pub starting_balance: BigDecimal,
    pub ending_balance: BigDecimal,
    pub status: SessionStatus,
}

impl ReconciliationSession {
    /// Start a new in-progress session for a statement
    pub fn new(
        id: String,
        statement_date: NaiveDate,
        bank_statement_entries: Vec<BankStatementEntry>,
        starting_balance: BigDecimal,
        ending_balance: BigDecimal,
    ) -> Self {
        Self {
            id,
            statement_date,
            bank_statement_entries,
            matches: Vec::new(),
            discrepancies: Vec::new(),
            starting_balance,
            ending_balance,
            status: SessionStatus::InProgress,
        }
    }

    /// Find a statement line by ID
    pub fn bank_entry(&self, bank_entry_id: &str) -> Option<&BankStatementEntry> {
        self.bank_statement_entries
            .iter()
            .find(|e| e.id == bank_entry_id)
    }
}

/// Adjusted-balance proof for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub book_balance: BigDecimal,
    pub bank_balance: BigDecimal,
    pub outstanding_checks: BigDecimal,
    pub deposits_in_transit: BigDecimal,
    /// Net of bank-originated items (interest minus fees and NSF checks)
    pub bank_adjustments: BigDecimal,
    /// Book-side corrections; the automatic classifier never fills this
    pub book_adjustments: BigDecimal,
    pub adjusted_book_balance: BigDecimal,
    pub adjusted_bank_balance: BigDecimal,
    pub difference: BigDecimal,
    pub is_balanced: bool,
}

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Bank entry already matched: {0}")]
    BankEntryAlreadyMatched(String),
    #[error("Journal entry already matched: {0}")]
    JournalEntryAlreadyMatched(String),
    #[error("Bank entry not found: {0}")]
    BankEntryNotFound(String),
    #[error("Journal entry not found: {0}")]
    JournalEntryNotFound(String),
    #[error("Match not found: {0}")]
    MatchNotFound(String),
    #[error("Discrepancy not found: {0}")]
    DiscrepancyNotFound(String),
    #[error("Discrepancy does not need an adjustment: {0}")]
    AdjustmentNotRequired(String),
    #[error("No posting rule for {0} adjustments")]
    AdjustmentNotSupported(DiscrepancyType),
    #[error("Reconciliation is not balanced: difference = {0}")]
    NotBalanced(BigDecimal),
    #[error("Cannot move session from {from} to {to}")]
    InvalidStatusTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
