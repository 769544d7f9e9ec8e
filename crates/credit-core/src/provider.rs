//! Provider traits for the disclosure service.
//!
//! This module defines the seams a credit lookup is assembled from:
//!
//! - [`DisclosureProvider`] - Base trait for all providers
//! - [`StatementSource`] - One statement request per attempt descriptor
//! - [`DirectorySource`] - Download of the corporation-code directory

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    attempt::AttemptDescriptor,
    directory::CorpDirectory,
    error::Result,
    types::{CorpCode, FinancialTable},
};

/// Base trait for all disclosure providers.
pub trait DisclosureProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "DART").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Source of financial statements.
///
/// Implementations issue exactly one request per call. A non-success status
/// from the service must be reported as [`CreditError::RemoteRejection`], and
/// transport failures as [`CreditError::Network`] or [`CreditError::Timeout`],
/// so the fetcher can record them faithfully.
///
/// [`CreditError::RemoteRejection`]: crate::error::CreditError::RemoteRejection
/// [`CreditError::Network`]: crate::error::CreditError::Network
/// [`CreditError::Timeout`]: crate::error::CreditError::Timeout
#[async_trait]
pub trait StatementSource: DisclosureProvider {
    /// Requests the statement selected by `descriptor` for one company.
    async fn fetch_statement(
        &self,
        corp_code: &CorpCode,
        descriptor: &AttemptDescriptor,
    ) -> Result<FinancialTable>;
}

/// Source of the corporation-code directory.
#[async_trait]
pub trait DirectorySource: DisclosureProvider {
    /// Downloads and decodes the full directory of listed companies.
    async fn fetch_directory(&self) -> Result<CorpDirectory>;
}
