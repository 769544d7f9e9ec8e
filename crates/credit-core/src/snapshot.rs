//! Financial snapshot extraction and credit ratios.
//!
//! A [`FinancialSnapshot`] is derived once per lookup from the matched
//! statement by keyword-matching account labels. [`CreditRatios`] turns the
//! snapshot into the four percentages fed to the default classifier.

use serde::{Deserialize, Serialize};

use crate::error::{CreditError, Result};
use crate::types::FinancialTable;

/// Account-label keywords for each snapshot field.
///
/// Keywords within a field are fallbacks: the next one is consulted only
/// while the value found so far is zero.
pub mod keywords {
    /// Total assets.
    pub const TOTAL_ASSETS: &[&str] = &["자산총계"];
    /// Total liabilities.
    pub const TOTAL_LIABILITIES: &[&str] = &["부채총계"];
    /// Total equity.
    pub const TOTAL_EQUITY: &[&str] = &["자본총계"];
    /// Revenue; financial and holding companies report operating revenue instead.
    pub const REVENUE: &[&str] = &["매출액", "영업수익", "수익(매출액)"];
    /// Operating income.
    pub const OPERATING_INCOME: &[&str] = &["영업이익"];
    /// Net income.
    pub const NET_INCOME: &[&str] = &["당기순이익"];
}

/// Headline figures extracted from a statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    /// Total assets.
    pub total_assets: f64,
    /// Total liabilities.
    pub total_liabilities: f64,
    /// Total equity.
    pub total_equity: f64,
    /// Revenue.
    pub revenue: f64,
    /// Operating income.
    pub operating_income: f64,
    /// Net income.
    pub net_income: f64,
}

impl FinancialSnapshot {
    /// Extracts the snapshot from a statement.
    ///
    /// Consolidated rows are preferred over separate rows. Fields without a
    /// matching label are `0.0`.
    #[must_use]
    pub fn from_table(table: &FinancialTable) -> Self {
        let rows = table.preferred_basis();
        Self {
            total_assets: first_nonzero(&rows, keywords::TOTAL_ASSETS),
            total_liabilities: first_nonzero(&rows, keywords::TOTAL_LIABILITIES),
            total_equity: first_nonzero(&rows, keywords::TOTAL_EQUITY),
            revenue: first_nonzero(&rows, keywords::REVENUE),
            operating_income: first_nonzero(&rows, keywords::OPERATING_INCOME),
            net_income: first_nonzero(&rows, keywords::NET_INCOME),
        }
    }

    /// Returns the names of the fields ratios cannot be computed without.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<String> {
        [
            ("total_assets", self.total_assets),
            ("revenue", self.revenue),
            ("total_equity", self.total_equity),
        ]
        .into_iter()
        .filter(|(_, value)| *value == 0.0)
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
    }

    /// Fails with [`CreditError::MissingFields`] if a required field is zero.
    pub fn require_core_fields(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CreditError::MissingFields(missing))
        }
    }
}

fn first_nonzero(table: &FinancialTable, candidates: &[&str]) -> f64 {
    candidates
        .iter()
        .map(|&keyword| table.value_of(&[keyword]))
        .find(|value| *value != 0.0)
        .unwrap_or(0.0)
}

/// Credit ratios in percent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreditRatios {
    /// Liabilities over equity.
    pub debt_ratio: f64,
    /// Operating income over revenue.
    pub operating_margin: f64,
    /// Net income over revenue.
    pub net_margin: f64,
    /// Net income over assets.
    pub return_on_assets: f64,
}

impl CreditRatios {
    /// Computes the ratios, failing if assets, revenue or equity is zero.
    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> Result<Self> {
        snapshot.require_core_fields()?;
        Ok(Self {
            debt_ratio: snapshot.total_liabilities / snapshot.total_equity * 100.0,
            operating_margin: snapshot.operating_income / snapshot.revenue * 100.0,
            net_margin: snapshot.net_income / snapshot.revenue * 100.0,
            return_on_assets: snapshot.net_income / snapshot.total_assets * 100.0,
        })
    }

    /// Returns the classifier feature vector:
    /// debt ratio, operating margin, net margin, return on assets.
    #[must_use]
    pub const fn features(&self) -> [f64; 4] {
        [
            self.debt_ratio,
            self.operating_margin,
            self.net_margin,
            self.return_on_assets,
        ]
    }
}
