//! Tiered financial-statement fetcher.
//!
//! [`TieredFetcher`] walks an [`AttemptSpace`] in priority order (freshest year
//! first, then report period tier, then granularity tier) and stops at the
//! first combination the disclosure service accepts. Every attempt, successful
//! or not, is recorded in the returned [`AttemptTrace`].
//!
//! Attempts are strictly sequential. There are no retries beyond the fixed
//! enumeration: a transport failure is recorded and the sweep moves on to the
//! next combination exactly as a rejection would.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    attempt::{AttemptDescriptor, AttemptOutcome, AttemptSpace, AttemptTrace},
    error::{CreditError, Result},
    period::ReportPeriod,
    provider::StatementSource,
    types::{CorpCode, FinancialTable},
};

/// A statement together with the combination that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedStatement {
    /// The accepted combination.
    pub descriptor: AttemptDescriptor,
    /// The statement rows.
    pub table: FinancialTable,
}

/// Outcome of one sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchReport {
    matched: Option<MatchedStatement>,
    trace: AttemptTrace,
}

impl FetchReport {
    /// Returns the matched statement, if any attempt succeeded.
    #[must_use]
    pub const fn matched(&self) -> Option<&MatchedStatement> {
        self.matched.as_ref()
    }

    /// Returns the statement rows, if any attempt succeeded.
    #[must_use]
    pub fn table(&self) -> Option<&FinancialTable> {
        self.matched.as_ref().map(|m| &m.table)
    }

    /// Returns the fiscal year of the matched statement.
    #[must_use]
    pub fn matched_year(&self) -> Option<i32> {
        self.matched.as_ref().map(|m| m.descriptor.year)
    }

    /// Returns the report period of the matched statement.
    #[must_use]
    pub fn matched_period(&self) -> Option<ReportPeriod> {
        self.matched.as_ref().map(|m| m.descriptor.period)
    }

    /// Returns the label of the matched report period (e.g. "annual").
    #[must_use]
    pub fn matched_period_label(&self) -> Option<&'static str> {
        self.matched_period().map(|p| p.label())
    }

    /// Returns every attempt made, in order.
    #[must_use]
    pub const fn trace(&self) -> &AttemptTrace {
        &self.trace
    }

    /// Returns true if a statement was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.matched.is_some()
    }

    /// Converts the report into the matched statement and trace, or a
    /// [`CreditError::NoStatementFound`] carrying the full trace.
    pub fn into_result(self, corp_code: &CorpCode) -> Result<(MatchedStatement, AttemptTrace)> {
        match self.matched {
            Some(matched) => Ok((matched, self.trace)),
            None => Err(CreditError::NoStatementFound {
                corp_code: corp_code.to_string(),
                trace: self.trace,
            }),
        }
    }
}

/// Sweeps the attempt space against a [`StatementSource`].
#[derive(Clone)]
pub struct TieredFetcher {
    source: Arc<dyn StatementSource>,
    space: AttemptSpace,
}

impl fmt::Debug for TieredFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TieredFetcher")
            .field("source", &self.source.name())
            .field("space", &self.space)
            .finish()
    }
}

impl TieredFetcher {
    /// Creates a fetcher over the default attempt space.
    #[must_use]
    pub fn new(source: Arc<dyn StatementSource>) -> Self {
        Self {
            source,
            space: AttemptSpace::default(),
        }
    }

    /// Replaces the attempt space.
    #[must_use]
    pub fn with_space(mut self, space: AttemptSpace) -> Self {
        self.space = space;
        self
    }

    /// Returns the attempt space.
    #[must_use]
    pub const fn space(&self) -> &AttemptSpace {
        &self.space
    }

    /// Runs one sweep for a company.
    ///
    /// Returns the first accepted statement, if any, and the trace of every
    /// attempt. A report without a match has a trace covering the whole space.
    #[instrument(skip(self, corp_code), fields(provider = self.source.name(), corp_code = %corp_code))]
    pub async fn fetch(&self, corp_code: &CorpCode) -> FetchReport {
        let mut trace = AttemptTrace::new();

        for descriptor in self.space.iter() {
            debug!(%descriptor, "Requesting statement");

            match self.source.fetch_statement(corp_code, &descriptor).await {
                Ok(table) => {
                    info!(%descriptor, rows = table.len(), "Statement found");
                    trace.push(descriptor, AttemptOutcome::Success { rows: table.len() });
                    return FetchReport {
                        matched: Some(MatchedStatement { descriptor, table }),
                        trace,
                    };
                }
                Err(e) => {
                    let outcome = classify_failure(e);
                    if outcome.is_rate_limited() {
                        warn!(%descriptor, "Request quota exhausted, continuing sweep");
                    } else {
                        debug!(%descriptor, %outcome, "Attempt failed");
                    }
                    trace.push(descriptor, outcome);
                }
            }
        }

        warn!(attempts = trace.len(), "No statement found in attempt space");
        FetchReport {
            matched: None,
            trace,
        }
    }
}

fn classify_failure(error: CreditError) -> AttemptOutcome {
    match error {
        CreditError::RemoteRejection { status, message } => {
            AttemptOutcome::Rejected { status, message }
        }
        CreditError::Timeout(cause) => AttemptOutcome::Transport {
            cause,
            timed_out: true,
        },
        other => AttemptOutcome::Transport {
            cause: other.to_string(),
            timed_out: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Granularity;
    use crate::provider::DisclosureProvider;
    use crate::types::LineItem;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Accepts only `accept`, rejects everything else with status "013",
    /// and fails with a transport error for descriptors in `broken`.
    #[derive(Debug)]
    struct ScriptedSource {
        accept: Option<AttemptDescriptor>,
        broken: Vec<AttemptDescriptor>,
        calls: Mutex<Vec<AttemptDescriptor>>,
    }

    impl ScriptedSource {
        fn new(accept: Option<AttemptDescriptor>) -> Self {
            Self {
                accept,
                broken: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<AttemptDescriptor> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DisclosureProvider for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        fn description(&self) -> &str {
            "Scripted statement source for tests"
        }
    }

    #[async_trait]
    impl StatementSource for ScriptedSource {
        async fn fetch_statement(
            &self,
            _corp_code: &CorpCode,
            descriptor: &AttemptDescriptor,
        ) -> Result<FinancialTable> {
            self.calls.lock().unwrap().push(*descriptor);
            if self.broken.contains(descriptor) {
                return Err(CreditError::Timeout("operation timed out".to_string()));
            }
            if self.accept == Some(*descriptor) {
                return Ok(FinancialTable::from_items(vec![LineItem::new(
                    "자산총계", "1,000",
                )]));
            }
            Err(CreditError::RemoteRejection {
                status: "013".to_string(),
                message: "no data".to_string(),
            })
        }
    }

    fn small_space() -> AttemptSpace {
        AttemptSpace::new(
            vec![2025, 2024],
            vec![ReportPeriod::ThirdQuarter, ReportPeriod::Annual],
            vec![Granularity::Aggregate, Granularity::Full],
        )
    }

    #[tokio::test]
    async fn test_stops_at_first_success_in_priority_order() {
        let target = AttemptDescriptor::new(2024, ReportPeriod::Annual, Granularity::Full);
        let source = Arc::new(ScriptedSource::new(Some(target)));
        let fetcher = TieredFetcher::new(source.clone()).with_space(small_space());

        let report = fetcher.fetch(&CorpCode::new("00159616")).await;

        assert!(report.is_found());
        assert_eq!(report.matched_year(), Some(2024));
        assert_eq!(report.matched_period_label(), Some("annual"));
        assert_eq!(report.table().map(FinancialTable::len), Some(1));

        let trace = report.trace();
        assert_eq!(trace.len(), 8);
        assert_eq!(trace.failures(), 7);
        assert!(trace.records()[..7].iter().all(|r| !r.outcome.is_success()));
        assert!(trace.records()[7].outcome.is_success());

        let expected: Vec<_> = small_space().iter().collect();
        assert_eq!(source.calls(), expected);
    }

    #[tokio::test]
    async fn test_exhausted_space_returns_full_trace() {
        let source = Arc::new(ScriptedSource::new(None));
        let fetcher =
            TieredFetcher::new(source.clone()).with_space(AttemptSpace::trailing_years(2025, 3));

        let report = fetcher.fetch(&CorpCode::new("00159616")).await;

        assert!(!report.is_found());
        assert_eq!(report.matched_year(), None);
        assert_eq!(report.matched_period_label(), None);
        assert_eq!(report.trace().len(), 18);
        assert_eq!(source.calls().len(), 18);
    }

    #[tokio::test]
    async fn test_first_descriptor_success_makes_one_call() {
        let first = AttemptDescriptor::new(2025, ReportPeriod::ThirdQuarter, Granularity::Aggregate);
        let source = Arc::new(ScriptedSource::new(Some(first)));
        let fetcher = TieredFetcher::new(source.clone()).with_space(small_space());

        let report = fetcher.fetch(&CorpCode::new("00159616")).await;

        assert_eq!(report.trace().len(), 1);
        assert_eq!(source.calls(), vec![first]);
        assert_eq!(report.matched_period_label(), Some("Q3"));
    }

    #[tokio::test]
    async fn test_transport_errors_are_recorded_and_skipped() {
        let target = AttemptDescriptor::new(2025, ReportPeriod::Annual, Granularity::Aggregate);
        let mut source = ScriptedSource::new(Some(target));
        source.broken = vec![AttemptDescriptor::new(
            2025,
            ReportPeriod::ThirdQuarter,
            Granularity::Full,
        )];
        let fetcher = TieredFetcher::new(Arc::new(source)).with_space(small_space());

        let report = fetcher.fetch(&CorpCode::new("00159616")).await;

        let outcomes: Vec<_> = report.trace().iter().map(|r| r.outcome.clone()).collect();
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], AttemptOutcome::Rejected { ref status, .. } if status == "013"));
        assert!(matches!(
            outcomes[1],
            AttemptOutcome::Transport {
                timed_out: true,
                ..
            }
        ));
        assert!(outcomes[2].is_success());
    }

    #[tokio::test]
    async fn test_into_result_carries_trace() {
        let source = Arc::new(ScriptedSource::new(None));
        let fetcher = TieredFetcher::new(source).with_space(small_space());
        let corp = CorpCode::new("00159616");

        match fetcher.fetch(&corp).await.into_result(&corp) {
            Err(CreditError::NoStatementFound { corp_code, trace }) => {
                assert_eq!(corp_code, "00159616");
                assert_eq!(trace.len(), 8);
            }
            other => panic!("expected NoStatementFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_space_makes_no_calls() {
        let source = Arc::new(ScriptedSource::new(None));
        let fetcher = TieredFetcher::new(source.clone())
            .with_space(AttemptSpace::new(vec![], vec![], vec![]));

        let report = fetcher.fetch(&CorpCode::new("00159616")).await;

        assert!(report.trace().is_empty());
        assert!(source.calls().is_empty());
    }
}
