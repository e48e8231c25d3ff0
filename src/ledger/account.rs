//! Chart of accounts

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ReconciliationConfig;

/// Account types following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountType {
    /// Assets - what the business owns (Cash, Receivables, Equipment, etc.)
    Asset,
    /// Liabilities - what the business owes (Loans, Accounts Payable, etc.)
    Liability,
    /// Equity - owner's interest in the business
    Equity,
    /// Income/Revenue - money earned by the business
    Income,
    /// Expenses - costs incurred by the business
    Expense,
}

/// Side on which an account normally carries its balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalBalance {
    Debit,
    Credit,
}

impl AccountType {
    /// Returns the normal balance side for this account type
    /// Assets and Expenses normally have debit balances
    /// Liabilities, Equity, and Income normally have credit balances
    pub fn normal_balance(&self) -> NormalBalance {
        match self {
            AccountType::Asset | AccountType::Expense => NormalBalance::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Income => {
                NormalBalance::Credit
            }
        }
    }

    /// Account type implied by the leading digit of an account code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.chars().next()? {
            '1' => Some(AccountType::Asset),
            '2' => Some(AccountType::Liability),
            '3' => Some(AccountType::Equity),
            '4' => Some(AccountType::Income),
            '5'..='9' => Some(AccountType::Expense),
            _ => None,
        }
    }
}

/// An account parsed from a `"<code> - <name>"` label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
}

impl Account {
    /// Create an account, deriving its type from the code
    pub fn new(code: &str, name: &str) -> Option<Self> {
        let account_type = AccountType::from_code(code)?;
        Some(Self {
            code: code.to_string(),
            name: name.to_string(),
            account_type,
        })
    }

    /// Parse a journal account label such as `"1011 - Cash"`
    pub fn parse(label: &str) -> Option<Self> {
        let (code, name) = label.split_once(" - ")?;
        let code = code.trim();
        let name = name.trim();
        if code.is_empty() || name.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Self::new(code, name)
    }

    /// The label journal entries use for this account
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

/// Standard small-business chart, including every account the
/// reconciliation defaults post to
pub fn standard_chart() -> Vec<Account> {
    [
        ("1011", "Cash"),
        ("1200", "Accounts Receivable"),
        ("1300", "Inventory"),
        ("1500", "Equipment"),
        ("2000", "Accounts Payable"),
        ("2100", "Loans Payable"),
        ("3000", "Owner's Equity"),
        ("3200", "Retained Earnings"),
        ("4000", "Sales Revenue"),
        ("4100", "Service Revenue"),
        ("4200", "Interest Income"),
        ("5000", "Cost of Goods Sold"),
        ("6000", "Rent Expense"),
        ("6100", "Bank Service Charges"),
        ("6200", "Utilities Expense"),
    ]
    .iter()
    .filter_map(|(code, name)| Account::new(code, name))
    .collect()
}

/// Check that a chart contains every account the configuration posts to
pub fn missing_config_accounts(chart: &[Account], config: &ReconciliationConfig) -> Vec<String> {
    let labels: Vec<String> = chart.iter().map(Account::label).collect();
    [
        &config.cash_account,
        &config.accounts.bank_fee_expense,
        &config.accounts.interest_income,
        &config.accounts.nsf_receivable,
    ]
    .into_iter()
    .filter(|wanted| !labels.iter().any(|l| l == *wanted))
    .cloned()
    .collect()
}
