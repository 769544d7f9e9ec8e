//! Corporation-code directory.
//!
//! Maps public trading codes to the disclosure service's internal company
//! identifiers. Only listed companies are indexed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CreditError, Result};
use crate::types::{CorpCode, StockCode};

/// One listed company in the directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpEntry {
    /// Internal disclosure-service identifier.
    pub corp_code: CorpCode,
    /// Public trading code.
    pub stock_code: StockCode,
    /// Registered company name.
    pub corp_name: String,
    /// Last modification date of the record.
    pub modify_date: Option<NaiveDate>,
}

impl CorpEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(
        corp_code: impl Into<CorpCode>,
        stock_code: impl Into<StockCode>,
        corp_name: impl Into<String>,
    ) -> Self {
        Self {
            corp_code: corp_code.into(),
            stock_code: stock_code.into(),
            corp_name: corp_name.into(),
            modify_date: None,
        }
    }

    /// Sets the modification date.
    #[must_use]
    pub const fn with_modify_date(mut self, date: NaiveDate) -> Self {
        self.modify_date = Some(date);
        self
    }
}

/// Directory of listed companies indexed by stock code.
#[derive(Clone, Debug, Default)]
pub struct CorpDirectory {
    entries: Vec<CorpEntry>,
    by_stock_code: HashMap<StockCode, usize>,
}

impl CorpDirectory {
    /// Builds a directory, dropping entries without a stock code.
    ///
    /// When a stock code repeats, the first entry wins.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = CorpEntry>) -> Self {
        let mut directory = Self::default();
        for entry in entries {
            if entry.stock_code.is_empty() {
                continue;
            }
            if directory.by_stock_code.contains_key(&entry.stock_code) {
                continue;
            }
            directory
                .by_stock_code
                .insert(entry.stock_code.clone(), directory.entries.len());
            directory.entries.push(entry);
        }
        directory
    }

    /// Looks up a company by its stock code.
    pub fn lookup(&self, stock_code: &StockCode) -> Result<&CorpEntry> {
        self.by_stock_code
            .get(stock_code)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| CreditError::CorpNotFound(stock_code.to_string()))
    }

    /// Returns true if the stock code is listed.
    #[must_use]
    pub fn contains(&self, stock_code: &StockCode) -> bool {
        self.by_stock_code.contains_key(stock_code)
    }

    /// Returns every entry whose name contains `fragment`, ignoring case.
    #[must_use]
    pub fn search_by_name(&self, fragment: &str) -> Vec<&CorpEntry> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.corp_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Returns the number of listed companies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &CorpEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> CorpDirectory {
        CorpDirectory::from_entries(vec![
            CorpEntry::new("00159616", "034020", "X Corp"),
            CorpEntry::new("00126380", "005930", "Samsung Electronics"),
            CorpEntry::new("00999999", "", "Unlisted Holdings"),
        ])
    }

    #[test]
    fn test_lookup_found() {
        let dir = directory();
        let entry = dir.lookup(&StockCode::new("034020")).unwrap();
        assert_eq!(entry.corp_code.as_str(), "00159616");
        assert_eq!(entry.corp_name, "X Corp");
    }

    #[test]
    fn test_lookup_not_found() {
        let dir = directory();
        match dir.lookup(&StockCode::new("999999")) {
            Err(CreditError::CorpNotFound(code)) => assert_eq!(code, "999999"),
            other => panic!("expected CorpNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unlisted_dropped() {
        let dir = directory();
        assert_eq!(dir.len(), 2);
        assert!(dir.search_by_name("unlisted").is_empty());
    }

    #[test]
    fn test_search_by_name() {
        let dir = directory();
        let hits = dir.search_by_name("samsung");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].stock_code.as_str(), "005930");
        assert!(dir.search_by_name(" ").is_empty());
    }

    #[test]
    fn test_duplicate_stock_code_keeps_first() {
        let dir = CorpDirectory::from_entries(vec![
            CorpEntry::new("00000001", "111111", "First"),
            CorpEntry::new("00000002", "111111", "Second"),
        ]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.lookup(&StockCode::new("111111")).unwrap().corp_name, "First");
    }
}
