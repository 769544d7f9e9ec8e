//! Credit monitor tying directory resolution, statement sweeps and scoring together.

use std::sync::Arc;

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use credit_cache::InMemoryDirectoryCache;
use credit_core::{
    AttemptDescriptor, AttemptSpace, AttemptTrace, CorpDirectory, CorpEntry, CreditError,
    CreditRatios, DefaultClassifier, DirectoryCache, DirectorySource, FetchReport, FinancialSnapshot,
    FinancialTable, Result, RiskAssessment, StatementSource, StockCode, TieredFetcher,
};

#[cfg(feature = "dart")]
use crate::config::CreditConfig;
#[cfg(feature = "dart")]
use credit_dart::DartProvider;

/// Full credit diagnosis for one company.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnosis {
    /// The resolved company.
    pub company: CorpEntry,
    /// The combination that produced the statement.
    pub descriptor: AttemptDescriptor,
    /// The statement rows.
    pub table: FinancialTable,
    /// Headline figures.
    pub snapshot: FinancialSnapshot,
    /// Credit ratios in percent.
    pub ratios: CreditRatios,
    /// Classifier output, when a classifier is configured.
    pub assessment: Option<RiskAssessment>,
    /// Every attempt made while locating the statement.
    pub trace: AttemptTrace,
}

impl Diagnosis {
    /// Fiscal year of the statement.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.descriptor.year
    }

    /// Label of the statement's report period (e.g. "Q3").
    #[must_use]
    pub const fn period_label(&self) -> &'static str {
        self.descriptor.period.label()
    }

    /// Statement rows as a DataFrame.
    pub fn statement_frame(&self) -> Result<DataFrame> {
        self.table.to_dataframe()
    }
}

/// Entry point for credit lookups.
///
/// Holds the directory source, the statement source, the directory cache and
/// an optional default classifier. The directory is downloaded once and reused
/// until [`reset`](Self::reset) is called.
///
/// # Example
///
/// ```rust,ignore
/// use credit::{CreditConfig, CreditMonitor, StockCode};
///
/// let monitor = CreditMonitor::from_config(&CreditConfig::from_env()?)?;
/// let diagnosis = monitor.diagnose(&StockCode::new("005930")).await?;
/// println!("{} {}: debt ratio {:.1}%", diagnosis.year(), diagnosis.period_label(), diagnosis.ratios.debt_ratio);
/// ```
pub struct CreditMonitor {
    directory_source: Arc<dyn DirectorySource>,
    fetcher: TieredFetcher,
    cache: Arc<dyn DirectoryCache>,
    classifier: Option<Arc<dyn DefaultClassifier>>,
}

impl std::fmt::Debug for CreditMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditMonitor")
            .field("directory_source", &self.directory_source.name())
            .field("attempts", &self.fetcher.space().len())
            .field("classifier", &self.classifier.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

impl CreditMonitor {
    /// Creates a monitor with an in-memory directory cache and the default
    /// attempt space.
    #[must_use]
    pub fn new(
        directory_source: Arc<dyn DirectorySource>,
        statements: Arc<dyn StatementSource>,
    ) -> Self {
        Self {
            directory_source,
            fetcher: TieredFetcher::new(statements),
            cache: Arc::new(InMemoryDirectoryCache::new()),
            classifier: None,
        }
    }

    /// Creates a monitor backed by Open DART for both roles.
    #[cfg(feature = "dart")]
    #[must_use]
    pub fn dart(provider: DartProvider) -> Self {
        let provider = Arc::new(provider);
        Self::new(provider.clone(), provider)
    }

    /// Builds a DART-backed monitor from configuration.
    ///
    /// Loads the classifier model when a model path is configured.
    #[cfg(feature = "dart")]
    pub fn from_config(config: &CreditConfig) -> Result<Self> {
        let mut provider =
            DartProvider::new(config.api_key.clone()).with_attempt_timeout(config.attempt_timeout);
        if let Some(base_url) = &config.base_url {
            provider = provider.with_base_url(base_url.clone());
        }

        let mut monitor = Self::dart(provider).with_space(config.attempt_space());
        if let Some(model) = config.load_model()? {
            monitor = monitor.with_classifier(Arc::new(model));
        }
        Ok(monitor)
    }

    /// Replaces the directory cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn DirectoryCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Sets the default classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn DefaultClassifier>) -> Self {
        debug!(classifier = classifier.name(), "Registering classifier");
        self.classifier = Some(classifier);
        self
    }

    /// Replaces the attempt space swept for statements.
    #[must_use]
    pub fn with_space(mut self, space: AttemptSpace) -> Self {
        self.fetcher = self.fetcher.with_space(space);
        self
    }

    /// Returns the attempt space swept for statements.
    #[must_use]
    pub const fn space(&self) -> &AttemptSpace {
        self.fetcher.space()
    }

    /// Returns the corporation directory, downloading it on a cache miss.
    ///
    /// Cache failures are logged and treated as a miss.
    pub async fn directory(&self) -> Result<Arc<CorpDirectory>> {
        let provider = self.directory_source.name();

        match self.cache.get_directory(provider).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(provider, error = %e, "Directory cache read failed"),
        }

        debug!(provider, "Downloading corporation directory");
        let directory = Arc::new(self.directory_source.fetch_directory().await?);

        if let Err(e) = self
            .cache
            .put_directory(provider, Arc::clone(&directory))
            .await
        {
            warn!(provider, error = %e, "Failed to cache corporation directory");
        }

        Ok(directory)
    }

    /// Resolves a stock code to its directory entry.
    #[instrument(skip(self, stock_code), fields(stock_code = %stock_code))]
    pub async fn resolve(&self, stock_code: &StockCode) -> Result<CorpEntry> {
        if stock_code.is_empty() {
            return Err(CreditError::InvalidParameter(
                "stock code must not be empty".to_string(),
            ));
        }

        let directory = self.directory().await?;
        let entry = directory.lookup(stock_code)?.clone();
        debug!(corp_code = %entry.corp_code, corp_name = %entry.corp_name, "Resolved company");
        Ok(entry)
    }

    /// Sweeps the attempt space for the company's freshest statement.
    pub async fn fetch_statement(&self, company: &CorpEntry) -> FetchReport {
        self.fetcher.fetch(&company.corp_code).await
    }

    /// Resolves, fetches, extracts and scores one company.
    #[instrument(skip(self, stock_code), fields(stock_code = %stock_code))]
    pub async fn diagnose(&self, stock_code: &StockCode) -> Result<Diagnosis> {
        let company = self.resolve(stock_code).await?;
        let (matched, trace) = self
            .fetch_statement(&company)
            .await
            .into_result(&company.corp_code)?;

        let snapshot = FinancialSnapshot::from_table(&matched.table);
        let ratios = CreditRatios::from_snapshot(&snapshot)?;
        let assessment = match &self.classifier {
            Some(classifier) => Some(RiskAssessment::assess(
                classifier.as_ref(),
                &ratios.features(),
            )?),
            None => None,
        };

        info!(
            corp_name = %company.corp_name,
            attempt = %matched.descriptor,
            attempts = trace.len(),
            debt_ratio = ratios.debt_ratio,
            "Diagnosis complete"
        );

        Ok(Diagnosis {
            company,
            descriptor: matched.descriptor,
            table: matched.table,
            snapshot,
            ratios,
            assessment,
            trace,
        })
    }

    /// Drops the cached directory so the next lookup downloads it again.
    pub async fn reset(&self) -> Result<()> {
        self.cache.clear().await?;
        info!("Directory cache cleared");
        Ok(())
    }
}
