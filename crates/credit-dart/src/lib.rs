#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/credit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! DART data provider for financial statements.
//!
//! This crate provides access to the Korean Financial Supervisory Service's
//! electronic disclosure system (Open DART), including:
//!
//! - Corporation-code directory download (zip archive of XML)
//! - Major-accounts and full-accounts statement endpoints
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use credit_core::{DirectorySource, StockCode, TieredFetcher};
//! use credit_dart::DartProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(DartProvider::new("your-api-key"));
//!
//!     let directory = provider.fetch_directory().await?;
//!     let company = directory.lookup(&StockCode::new("005930"))?;
//!
//!     let report = TieredFetcher::new(provider.clone())
//!         .fetch(&company.corp_code)
//!         .await;
//!     for attempt in report.trace() {
//!         println!("{attempt}");
//!     }
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use credit_core::{
    AttemptDescriptor, CorpCode, CorpDirectory, CreditError, DirectorySource, DisclosureProvider,
    FinancialTable, LineItem, Result, StatementBasis, StatementSource,
};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Decoding of the corporation-code archive.
pub mod corp_code;

/// Open DART API base URL
const DART_BASE_URL: &str = "https://opendart.fss.or.kr";

/// Status code DART uses for a successful response
const STATUS_OK: &str = "000";

/// Time budget for one statement attempt
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

/// Time budget for the directory download (the archive is several megabytes)
const DEFAULT_DIRECTORY_TIMEOUT: Duration = Duration::from_secs(60);

/// Open DART data provider.
///
/// Every statement request carries its own short timeout so a slow endpoint
/// costs one attempt rather than the whole sweep.
#[derive(Clone)]
pub struct DartProvider {
    client: Client,
    api_key: String,
    base_url: String,
    attempt_timeout: Duration,
    directory_timeout: Duration,
}

impl fmt::Debug for DartProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DartProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}

impl DartProvider {
    /// Create a new DART provider with the given API key.
    ///
    /// # Example
    /// ```
    /// use credit_dart::DartProvider;
    ///
    /// let provider = DartProvider::new("your-api-key");
    /// ```
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new DART provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DART_BASE_URL.to_string(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            directory_timeout: DEFAULT_DIRECTORY_TIMEOUT,
        }
    }

    /// Point the provider at a different host (e.g. a mirror or a test server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the time budget for each statement attempt.
    #[must_use]
    pub const fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Set the time budget for the directory download.
    #[must_use]
    pub const fn with_directory_timeout(mut self, timeout: Duration) -> Self {
        self.directory_timeout = timeout;
        self
    }

    /// Returns the configured time budget for each statement attempt.
    #[must_use]
    pub const fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/api/{resource}", self.base_url)
    }
}

/// Maps a reqwest failure onto the error taxonomy.
fn transport_error(e: reqwest::Error) -> CreditError {
    if e.is_timeout() {
        CreditError::Timeout(e.to_string())
    } else if e.is_decode() {
        CreditError::Parse(e.to_string())
    } else {
        CreditError::Network(e.to_string())
    }
}

impl DisclosureProvider for DartProvider {
    fn name(&self) -> &str {
        "DART"
    }

    fn description(&self) -> &str {
        "Open DART provider for Korean corporate financial statements and corporation codes"
    }
}

#[async_trait]
impl StatementSource for DartProvider {
    #[instrument(skip(self, corp_code), fields(corp_code = %corp_code, attempt = %descriptor))]
    async fn fetch_statement(
        &self,
        corp_code: &CorpCode,
        descriptor: &AttemptDescriptor,
    ) -> Result<FinancialTable> {
        let url = self.url(&format!("{}.json", descriptor.granularity.endpoint()));
        let year = descriptor.year.to_string();

        debug!("Fetching statement from {}", url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("crtfc_key", self.api_key.as_str()),
                ("corp_code", corp_code.as_str()),
                ("bsns_year", year.as_str()),
                ("reprt_code", descriptor.period.code()),
            ])
            .timeout(self.attempt_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(CreditError::Network(format!(
                "Statement request failed: HTTP {}",
                response.status()
            )));
        }

        let body: StatementResponse = response.json().await.map_err(transport_error)?;

        if body.status != STATUS_OK {
            return Err(CreditError::RemoteRejection {
                status: body.status,
                message: body.message,
            });
        }

        Ok(body.list.into_iter().map(AccountRow::into_line_item).collect())
    }
}

#[async_trait]
impl DirectorySource for DartProvider {
    #[instrument(skip(self))]
    async fn fetch_directory(&self) -> Result<CorpDirectory> {
        let url = self.url("corpCode.xml");

        debug!("Downloading corporation directory from {}", url);
        let response = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.api_key.as_str())])
            .timeout(self.directory_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(CreditError::Network(format!(
                "Failed to download corporation directory: HTTP {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;

        let directory = tokio::task::spawn_blocking(move || corp_code::decode_archive(&bytes))
            .await
            .map_err(|e| CreditError::Other(format!("Directory decode task failed: {e}")))??;

        debug!(companies = directory.len(), "Corporation directory loaded");
        Ok(directory)
    }
}

// =============================================================================
// DART API Response Types
// =============================================================================

/// Response from the statement endpoints.
#[derive(Debug, Deserialize)]
struct StatementResponse {
    /// "000" on success, an error code otherwise
    status: String,
    /// Human-readable status message
    #[serde(default)]
    message: String,
    /// Account rows (absent on error)
    #[serde(default)]
    list: Vec<AccountRow>,
}

/// One account row of a statement.
#[derive(Debug, Deserialize)]
struct AccountRow {
    /// Account label
    account_nm: String,
    /// Current-term amount, with thousands separators
    #[serde(default)]
    thstrm_amount: Option<String>,
    /// "CFS" (consolidated) or "OFS" (separate)
    #[serde(default)]
    fs_div: Option<String>,
    /// Statement section ("BS", "IS", ...)
    #[serde(default)]
    sj_div: Option<String>,
}

impl AccountRow {
    fn into_line_item(self) -> LineItem {
        let mut item = LineItem::new(self.account_nm, self.thstrm_amount.unwrap_or_default());
        if let Some(basis) = self.fs_div.as_deref().and_then(StatementBasis::from_code) {
            item = item.with_basis(basis);
        }
        if let Some(statement) = self.sj_div {
            item = item.with_statement(statement);
        }
        item
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use credit_core::{Granularity, ReportPeriod};

    #[test]
    fn test_provider_traits() {
        let provider = DartProvider::new("test-key");

        assert_eq!(DisclosureProvider::name(&provider), "DART");
        assert!(!provider.description().is_empty());
        assert_eq!(provider.attempt_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = DartProvider::new("super-secret");
        let debug = format!("{provider:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_url_building() {
        let provider = DartProvider::new("k").with_base_url("http://localhost:8080/");
        let descriptor = AttemptDescriptor::new(2024, ReportPeriod::Annual, Granularity::Full);
        assert_eq!(
            provider.url(&format!("{}.json", descriptor.granularity.endpoint())),
            "http://localhost:8080/api/fnlttSinglAcnt.json"
        );
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "status": "000",
            "message": "정상",
            "list": [
                {"account_nm": "자산총계", "thstrm_amount": "1,234", "fs_div": "CFS", "sj_div": "BS"},
                {"account_nm": "부채총계", "fs_div": "OFS"}
            ]
        }"#;
        let body: StatementResponse = serde_json::from_str(json).unwrap();
        let table: FinancialTable = body.list.into_iter().map(AccountRow::into_line_item).collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.items()[0].value(), 1234.0);
        assert_eq!(table.items()[0].basis, Some(StatementBasis::Consolidated));
        assert_eq!(table.items()[0].statement.as_deref(), Some("BS"));
        assert_eq!(table.items()[1].value(), 0.0);
    }

    #[test]
    fn test_error_response_parsing() {
        let json = r#"{"status": "013", "message": "조회된 데이타가 없습니다."}"#;
        let body: StatementResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "013");
        assert!(body.list.is_empty());
    }
}
