//! Ledger module containing the chart of accounts, balances and reports

pub mod account;
pub mod balance;
pub mod reports;

pub use account::*;
pub use balance::*;
pub use reports::*;
