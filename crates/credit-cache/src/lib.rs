#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/credit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching implementations for the corporation directory.
//!
//! This crate provides implementations of the [`DirectoryCache`] trait from `credit-core`:
//!
//! - [`InMemoryDirectoryCache`] - Process-wide in-memory cache (read-through, clearable)
//! - [`NoopCache`] - No-op cache that doesn't store anything

/// In-memory cache implementation.
pub mod memory;
/// No-op cache implementation.
pub mod noop;

// Re-export the trait for convenience
pub use credit_core::DirectoryCache;

// Re-export implementations
pub use memory::InMemoryDirectoryCache;
pub use noop::NoopCache;
