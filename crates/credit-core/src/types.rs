//! Core data types for credit lookups.
//!
//! This module defines the fundamental data structures:
//!
//! - [`StockCode`] - Public trading code used as the lookup key
//! - [`CorpCode`] - Internal disclosure-service company identifier
//! - [`LineItem`] - One labeled row of a financial statement
//! - [`FinancialTable`] - The tabular statement returned by a successful attempt

use polars::prelude::{Column, DataFrame, PlSmallStr};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{CreditError, Result};

/// A public trading code (e.g. "034020").
///
/// Codes are trimmed and uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockCode(String);

impl StockCode {
    /// Creates a new stock code, trimming surrounding whitespace.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the code is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StockCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for StockCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StockCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The disclosure service's eight-digit company identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorpCode(String);

impl CorpCode {
    /// Creates a new corporation code.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CorpCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Whether a statement row belongs to the consolidated or separate statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementBasis {
    /// Consolidated financial statement (`CFS`).
    Consolidated,
    /// Separate (parent-only) financial statement (`OFS`).
    Separate,
}

impl StatementBasis {
    /// Parses the service's `fs_div` marker.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "CFS" => Some(Self::Consolidated),
            "OFS" => Some(Self::Separate),
            _ => None,
        }
    }

    /// Returns the service's `fs_div` marker.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Consolidated => "CFS",
            Self::Separate => "OFS",
        }
    }
}

/// One labeled row of a financial statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Account label as delivered (e.g. "자산총계").
    pub account_name: String,
    /// Current-term amount as delivered, possibly with thousands separators.
    pub amount: String,
    /// Consolidated/separate marker, when the endpoint provides one.
    pub basis: Option<StatementBasis>,
    /// Statement section code (e.g. "BS", "IS").
    pub statement: Option<String>,
}

impl LineItem {
    /// Creates a line item with the required fields.
    #[must_use]
    pub fn new(account_name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            amount: amount.into(),
            basis: None,
            statement: None,
        }
    }

    /// Sets the consolidated/separate marker.
    #[must_use]
    pub const fn with_basis(mut self, basis: StatementBasis) -> Self {
        self.basis = Some(basis);
        self
    }

    /// Sets the statement section code.
    #[must_use]
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    /// Returns the parsed current-term amount.
    #[must_use]
    pub fn value(&self) -> f64 {
        parse_amount(&self.amount)
    }
}

/// Tabular financial statement returned by a successful attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialTable {
    items: Vec<LineItem>,
}

impl FinancialTable {
    /// Creates a table from line items.
    #[must_use]
    pub const fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the rows.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the rows of the preferred statement basis.
    ///
    /// Consolidated rows win when present, otherwise separate rows. A table
    /// without any basis marker is returned whole.
    #[must_use]
    pub fn preferred_basis(&self) -> Self {
        if self.items.iter().all(|item| item.basis.is_none()) {
            return self.clone();
        }
        let consolidated = self.filter_basis(StatementBasis::Consolidated);
        if consolidated.is_empty() {
            self.filter_basis(StatementBasis::Separate)
        } else {
            consolidated
        }
    }

    /// Returns only the rows with the given basis.
    #[must_use]
    pub fn filter_basis(&self, basis: StatementBasis) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.basis == Some(basis))
                .cloned()
                .collect(),
        }
    }

    /// Finds the first row whose label contains `keyword`, ignoring whitespace.
    #[must_use]
    pub fn find(&self, keyword: &str) -> Option<&LineItem> {
        let needle = strip_whitespace(keyword);
        self.items
            .iter()
            .find(|item| strip_whitespace(&item.account_name).contains(&needle))
    }

    /// Returns the amount of the first row matching any keyword, tried in order.
    ///
    /// Returns `0.0` when nothing matches.
    #[must_use]
    pub fn value_of(&self, keywords: &[&str]) -> f64 {
        keywords
            .iter()
            .find_map(|keyword| self.find(keyword))
            .map_or(0.0, LineItem::value)
    }

    /// Exports the table as a DataFrame with columns
    /// `account_nm`, `thstrm_amount`, `amount`, `fs_div`, `sj_div`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.items.iter().map(|i| i.account_name.as_str()).collect();
        let raw: Vec<&str> = self.items.iter().map(|i| i.amount.as_str()).collect();
        let amounts: Vec<f64> = self.items.iter().map(LineItem::value).collect();
        let bases: Vec<Option<&str>> = self
            .items
            .iter()
            .map(|i| i.basis.map(|b| b.code()))
            .collect();
        let statements: Vec<Option<&str>> =
            self.items.iter().map(|i| i.statement.as_deref()).collect();

        DataFrame::new(vec![
            Column::new(PlSmallStr::from("account_nm"), names),
            Column::new(PlSmallStr::from("thstrm_amount"), raw),
            Column::new(PlSmallStr::from("amount"), amounts),
            Column::new(PlSmallStr::from("fs_div"), bases),
            Column::new(PlSmallStr::from("sj_div"), statements),
        ])
        .map_err(|e| CreditError::Other(e.to_string()))
    }
}

impl FromIterator<LineItem> for FinancialTable {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Parses an amount string as delivered by the disclosure service.
///
/// Thousands separators and surrounding whitespace are removed. Empty strings
/// and the "-" placeholder yield `0.0`; so does anything unparseable.
#[must_use]
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "-" {
        return 0.0;
    }
    cleaned.parse().unwrap_or_else(|_| {
        warn!(raw, "Unparseable amount, treating as zero");
        0.0
    })
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
