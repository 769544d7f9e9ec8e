#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/credit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Credit lookups over Korean corporate disclosures.
//!
//! This crate re-exports the core types and the DART provider, and provides a
//! [`CreditMonitor`] that resolves a stock code, sweeps for the freshest
//! statement and computes credit ratios and a risk grade.
//!
//! # Features
//!
//! - `dart` - Open DART provider and [`CreditMonitor::from_config`] (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use credit::{CreditConfig, CreditMonitor, StockCode};
//!
//! #[tokio::main]
//! async fn main() -> credit::Result<()> {
//!     let monitor = CreditMonitor::from_config(&CreditConfig::from_env()?)?;
//!
//!     let diagnosis = monitor.diagnose(&StockCode::new("034020")).await?;
//!     println!("{} ({} {})", diagnosis.company.corp_name, diagnosis.year(), diagnosis.period_label());
//!     if let Some(assessment) = diagnosis.assessment {
//!         println!("{:.2}% {}", assessment.default_probability, assessment.grade.verdict());
//!     }
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use credit_core::*;

// Cache implementations
pub use credit_cache::{InMemoryDirectoryCache, NoopCache};

// Providers
#[cfg(feature = "dart")]
pub use credit_dart::DartProvider;

mod config;
pub use config::CreditConfig;

mod monitor;
pub use monitor::{CreditMonitor, Diagnosis};
