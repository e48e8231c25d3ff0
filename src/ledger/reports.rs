//! Financial statements derived from the journal

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ledger::account::{Account, AccountType, NormalBalance};
use crate::types::*;

/// Account balance information for trial balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account information
    pub account: Account,
    /// Debit balance (if applicable)
    pub debit_balance: Option<BigDecimal>,
    /// Credit balance (if applicable)
    pub credit_balance: Option<BigDecimal>,
}

impl AccountBalance {
    /// Balance measured on the account's normal side (negative when contra)
    pub fn normal_amount(&self) -> BigDecimal {
        let zero = BigDecimal::from(0);
        let debit = self.debit_balance.as_ref().unwrap_or(&zero);
        let credit = self.credit_balance.as_ref().unwrap_or(&zero);
        match self.account.account_type.normal_balance() {
            NormalBalance::Debit => debit - credit,
            NormalBalance::Credit => credit - debit,
        }
    }

    fn from_net_debit(account: Account, net_debit: BigDecimal) -> Self {
        if net_debit >= BigDecimal::from(0) {
            Self {
                account,
                debit_balance: Some(net_debit),
                credit_balance: None,
            }
        } else {
            Self {
                account,
                debit_balance: None,
                credit_balance: Some(net_debit.abs()),
            }
        }
    }
}

/// Trial Balance - snapshot of all account balances at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub as_of_date: NaiveDate,
    /// Balances keyed by account code
    pub balances: BTreeMap<String, AccountBalance>,
    pub total_debits: BigDecimal,
    pub total_credits: BigDecimal,
    pub is_balanced: bool,
    /// Journal account labels that could not be parsed
    pub unrecognized_accounts: Vec<String>,
}

/// Income Statement structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub revenue: Vec<AccountBalance>,
    pub expenses: Vec<AccountBalance>,
    pub total_revenue: BigDecimal,
    pub total_expenses: BigDecimal,
    pub net_income: BigDecimal,
}

/// Balance Sheet structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub as_of_date: NaiveDate,
    pub assets: Vec<AccountBalance>,
    pub liabilities: Vec<AccountBalance>,
    pub equity: Vec<AccountBalance>,
    pub total_assets: BigDecimal,
    pub total_liabilities: BigDecimal,
    pub total_equity: BigDecimal,
    pub is_balanced: bool,
}

/// Net debit per account for lines dated within the range
fn net_by_account(
    journal_entries: &[JournalEntry],
    start_date: Option<NaiveDate>,
    end_date: NaiveDate,
) -> (BTreeMap<String, (Account, BigDecimal)>, Vec<String>) {
    let mut totals: BTreeMap<String, (Account, BigDecimal)> = BTreeMap::new();
    let mut unrecognized = Vec::new();

    for entry in journal_entries {
        if entry.date > end_date || start_date.is_some_and(|start| entry.date < start) {
            continue;
        }

        match Account::parse(&entry.account) {
            Some(account) => {
                let slot = totals
                    .entry(account.code.clone())
                    .or_insert_with(|| (account, BigDecimal::from(0)));
                slot.1 += entry.net_debit();
            }
            None => {
                if !unrecognized.contains(&entry.account) {
                    unrecognized.push(entry.account.clone());
                }
            }
        }
    }

    (totals, unrecognized)
}

/// Trial balance of every account with activity up to `as_of_date`
pub fn trial_balance(
    journal_entries: &[JournalEntry],
    as_of_date: NaiveDate,
    tolerance: &BigDecimal,
) -> TrialBalance {
    let (totals, unrecognized_accounts) = net_by_account(journal_entries, None, as_of_date);
    let mut balances = BTreeMap::new();
    let mut total_debits = BigDecimal::from(0);
    let mut total_credits = BigDecimal::from(0);

    for (code, (account, net_debit)) in totals {
        let balance = AccountBalance::from_net_debit(account, net_debit);
        if let Some(debit) = &balance.debit_balance {
            total_debits += debit;
        }
        if let Some(credit) = &balance.credit_balance {
            total_credits += credit;
        }
        balances.insert(code, balance);
    }

    if !unrecognized_accounts.is_empty() {
        tracing::warn!(
            accounts = ?unrecognized_accounts,
            "Trial balance skipped unrecognized accounts"
        );
    }

    let is_balanced = (&total_debits - &total_credits).abs() < *tolerance;

    TrialBalance {
        as_of_date,
        balances,
        total_debits,
        total_credits,
        is_balanced,
        unrecognized_accounts,
    }
}

fn balances_of_type(trial: &TrialBalance, account_type: AccountType) -> Vec<AccountBalance> {
    trial
        .balances
        .values()
        .filter(|b| b.account.account_type == account_type)
        .cloned()
        .collect()
}

/// Income statement for activity between the two dates (inclusive)
pub fn income_statement(
    journal_entries: &[JournalEntry],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> IncomeStatement {
    let (totals, _) = net_by_account(journal_entries, Some(start_date), end_date);

    let mut revenue = Vec::new();
    let mut expenses = Vec::new();
    for (_, (account, net_debit)) in totals {
        match account.account_type {
            AccountType::Income => revenue.push(AccountBalance::from_net_debit(account, net_debit)),
            AccountType::Expense => {
                expenses.push(AccountBalance::from_net_debit(account, net_debit))
            }
            AccountType::Asset | AccountType::Liability | AccountType::Equity => {}
        }
    }

    let total_revenue: BigDecimal = revenue.iter().map(|ab| ab.normal_amount()).sum();
    let total_expenses: BigDecimal = expenses.iter().map(|ab| ab.normal_amount()).sum();
    let net_income = &total_revenue - &total_expenses;

    IncomeStatement {
        start_date,
        end_date,
        revenue,
        expenses,
        total_revenue,
        total_expenses,
        net_income,
    }
}

/// Balance sheet as of a date, with net income rolled into equity
pub fn balance_sheet(
    journal_entries: &[JournalEntry],
    as_of_date: NaiveDate,
    tolerance: &BigDecimal,
) -> BalanceSheet {
    let trial = trial_balance(journal_entries, as_of_date, tolerance);

    let assets = balances_of_type(&trial, AccountType::Asset);
    let liabilities = balances_of_type(&trial, AccountType::Liability);
    let mut equity = balances_of_type(&trial, AccountType::Equity);

    // Calculate net income from revenue and expenses
    let total_income: BigDecimal = balances_of_type(&trial, AccountType::Income)
        .iter()
        .map(|ab| ab.normal_amount())
        .sum();
    let total_expenses: BigDecimal = balances_of_type(&trial, AccountType::Expense)
        .iter()
        .map(|ab| ab.normal_amount())
        .sum();
    let net_income = &total_income - &total_expenses;

    // Add net income to equity as retained earnings (if non-zero)
    if net_income != BigDecimal::from(0) {
        if let Some(account) = Account::new("3999", "Current Year Earnings") {
            // Equity is credit-normal, so earnings are a negative net debit
            equity.push(AccountBalance::from_net_debit(account, -net_income));
        }
    }

    let total_assets: BigDecimal = assets.iter().map(|ab| ab.normal_amount()).sum();
    let total_liabilities: BigDecimal = liabilities.iter().map(|ab| ab.normal_amount()).sum();
    let total_equity: BigDecimal = equity.iter().map(|ab| ab.normal_amount()).sum();

    let is_balanced =
        (&total_assets - (&total_liabilities + &total_equity)).abs() < *tolerance;

    BalanceSheet {
        as_of_date,
        assets,
        liabilities,
        equity,
        total_assets,
        total_liabilities,
        total_equity,
        is_balanced,
    }
}
