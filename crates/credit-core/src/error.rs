//! Error types for credit lookups.
//!
//! This module defines [`CreditError`] which covers every way a lookup can fail:
//! resolving the company, sweeping the disclosure service, extracting figures,
//! or scoring them.

use thiserror::Error;

use crate::attempt::AttemptTrace;

/// Errors that can occur during a credit lookup.
#[derive(Error, Debug)]
pub enum CreditError {
    /// Network-related errors (connection failures, bad HTTP status, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within its time budget.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The disclosure service answered with a non-success status.
    #[error("Disclosure service rejected the request ({status}): {message}")]
    RemoteRejection {
        /// Status code reported by the service (e.g. "013").
        status: String,
        /// Human-readable message reported by the service.
        message: String,
    },

    /// The stock code is not present in the corporation directory.
    #[error("Stock code not found in corporation directory: {0}")]
    CorpNotFound(String),

    /// Every combination of the attempt space failed.
    #[error("No statement found for {corp_code} after {} attempts", .trace.len())]
    NoStatementFound {
        /// The corporation code that was swept.
        corp_code: String,
        /// Every attempt made, in order.
        trace: AttemptTrace,
    },

    /// Required figures were zero or missing after extraction.
    #[error("Missing required financial data: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// No credential was supplied for the disclosure service.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The default classifier failed or produced an invalid output.
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`CreditError`].
pub type Result<T> = std::result::Result<T, CreditError>;
