//! Reconciliation settings
//!
//! Every field has a default, so a TOML file only needs to name what it
//! overrides:
//!
//! ```toml
//! cash_account = "1010 - Operating Account"
//! match_threshold = 70
//!
//! [accounts]
//! bank_fee_expense = "6150 - Bank Charges"
//! ```

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::*;

/// Top-level reconciliation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Only journal lines posted to this account take part in reconciliation
    pub cash_account: String,
    /// Largest difference still treated as equal money
    pub tolerance: BigDecimal,
    /// Minimum score for an automatic match
    pub match_threshold: u8,
    pub scoring: ScoringConfig,
    pub accounts: AdjustmentAccounts,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            cash_account: DEFAULT_CASH_ACCOUNT.to_string(),
            tolerance: BigDecimal::new(1.into(), 2),
            match_threshold: 80,
            scoring: ScoringConfig::default(),
            accounts: AdjustmentAccounts::default(),
        }
    }
}

/// Points awarded by the matcher for each kind of evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub amount_match: u8,
    /// Awarded when dates are at most `date_close_days` apart
    pub date_close: u8,
    pub date_close_days: i64,
    /// Awarded when dates are at most `date_near_days` apart
    pub date_near: u8,
    pub date_near_days: i64,
    /// Awarded when the bank reference contains the journal reference
    pub reference_match: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            amount_match: 50,
            date_close: 30,
            date_close_days: 1,
            date_near: 15,
            date_near_days: 3,
            reference_match: 20,
        }
    }
}

/// Offset accounts used when posting correcting entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentAccounts {
    pub bank_fee_expense: String,
    pub interest_income: String,
    /// Where a returned customer check is charged back to
    pub nsf_receivable: String,
}

impl Default for AdjustmentAccounts {
    fn default() -> Self {
        Self {
            bank_fee_expense: "6100 - Bank Service Charges".to_string(),
            interest_income: "4200 - Interest Income".to_string(),
            nsf_receivable: "1200 - Accounts Receivable".to_string(),
        }
    }
}

impl ReconciliationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> ReconResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ReconError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> ReconResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ReconError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "Loading reconciliation config");
        Self::from_toml_str(&source)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> ReconResult<()> {
        if self.cash_account.trim().is_empty() {
            return Err(ReconError::Config(
                "cash_account cannot be empty".to_string(),
            ));
        }

        if self.tolerance <= BigDecimal::from(0) {
            return Err(ReconError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }

        if self.match_threshold == 0 || self.match_threshold > 100 {
            return Err(ReconError::Config(format!(
                "match_threshold must be between 1 and 100, got {}",
                self.match_threshold
            )));
        }

        if self.scoring.date_close_days < 0
            || self.scoring.date_near_days < self.scoring.date_close_days
        {
            return Err(ReconError::Config(
                "date windows must satisfy 0 <= date_close_days <= date_near_days".to_string(),
            ));
        }

        let accounts = &self.accounts;
        for (name, value) in [
            ("bank_fee_expense", &accounts.bank_fee_expense),
            ("interest_income", &accounts.interest_income),
            ("nsf_receivable", &accounts.nsf_receivable),
        ] {
            if value.trim().is_empty() {
                return Err(ReconError::Config(format!("accounts.{} cannot be empty", name)));
            }
            if *value == self.cash_account {
                return Err(ReconError::Config(format!(
                    "accounts.{} cannot be the cash account",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Whether two amounts are equal within tolerance
    pub fn amounts_equal(&self, a: &BigDecimal, b: &BigDecimal) -> bool {
        (a - b).abs() < self.tolerance
    }
}
