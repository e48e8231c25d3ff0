//! # Bookkeeping Recon
//!
//! Double-entry bookkeeping core centred on bank reconciliation: pairing
//! bank statement lines with cash-account journal lines, explaining what is
//! left unmatched, and proving that book and bank balances agree.
//!
//! ## Features
//!
//! - **Matching**: confidence-scored, greedy first-fit pairing of statement and journal lines
//! - **Discrepancy classification**: outstanding checks, deposits in transit, bank fees, interest and NSF checks
//! - **Reconciliation summary**: adjusted book and bank balances with a fixed money tolerance
//! - **Adjusting entries**: balanced journal pairs for bank-originated items
//! - **Financial reporting**: general ledger, trial balance, income statement and balance sheet
//! - **Storage abstraction**: journal access through the async `JournalStore` trait
//!
//! ## Quick Start
//!
//! ```rust
//! use bookkeeping_recon::{BankStatementEntry, JournalEntry, MatchType, ReconciliationEngine};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
//! let bank = vec![BankStatementEntry::deposit(
//!     "b1".to_string(),
//!     date,
//!     "Deposit".to_string(),
//!     BigDecimal::from(1500),
//!     BigDecimal::from(11500),
//! )
//! .with_reference("DEP001")];
//! let journal = vec![JournalEntry::debit(
//!     "j1".to_string(),
//!     date,
//!     "1011 - Cash".to_string(),
//!     "Customer payment".to_string(),
//!     BigDecimal::from(1500),
//! )
//! .with_reference("DEP001")];
//!
//! let engine = ReconciliationEngine::new();
//! let matches = engine.auto_match_transactions(&bank, &journal, &[]);
//! assert_eq!(matches[0].match_type, MatchType::Exact);
//! ```

pub mod config;
pub mod ledger;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
pub use utils::format_currency;
