#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/credit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for credit signals built on disclosure data.
//!
//! This crate provides the foundational abstractions:
//!
//! - [`StatementSource`](provider::StatementSource) - One statement request per attempt
//! - [`DirectorySource`](provider::DirectorySource) - Corporation-code directory download
//! - [`TieredFetcher`](fetcher::TieredFetcher) - Priority sweep over the attempt space
//! - [`FinancialSnapshot`](snapshot::FinancialSnapshot) - Keyword extraction of headline figures
//! - [`DefaultClassifier`](classifier::DefaultClassifier) - Default-probability seam
//! - [`DirectoryCache`](cache::DirectoryCache) - Caching abstraction

/// Attempt descriptors, attempt space and attempt trace.
pub mod attempt;
/// Cache trait for the corporation directory.
pub mod cache;
/// Default classifier trait, logistic model and risk grades.
pub mod classifier;
/// Corporation-code directory.
pub mod directory;
/// Error types for credit lookups.
pub mod error;
/// The tiered statement fetcher.
pub mod fetcher;
/// Report period and statement granularity definitions.
pub mod period;
/// Provider traits for the disclosure service.
pub mod provider;
/// Snapshot extraction and credit ratios.
pub mod snapshot;
/// Core data types (StockCode, CorpCode, FinancialTable, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use attempt::{AttemptDescriptor, AttemptOutcome, AttemptRecord, AttemptSpace, AttemptTrace};
pub use cache::DirectoryCache;
pub use classifier::{DefaultClassifier, LogisticModel, RiskAssessment, RiskGrade};
pub use directory::{CorpDirectory, CorpEntry};
pub use error::{CreditError, Result};
pub use fetcher::{FetchReport, MatchedStatement, TieredFetcher};
pub use period::{Granularity, ReportPeriod};
pub use provider::{DirectorySource, DisclosureProvider, StatementSource};
pub use snapshot::{CreditRatios, FinancialSnapshot};
pub use types::{CorpCode, FinancialTable, LineItem, StatementBasis, StockCode, parse_amount};
