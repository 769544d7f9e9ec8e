//! Attempt descriptors, the attempt space and the attempt trace.
//!
//! A fetch sweep walks an [`AttemptSpace`] in priority order and records one
//! [`AttemptRecord`] per request in an [`AttemptTrace`].

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::period::{Granularity, ReportPeriod};

/// One (fiscal year, report period, granularity) combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptDescriptor {
    /// Fiscal (business) year.
    pub year: i32,
    /// Report period.
    pub period: ReportPeriod,
    /// Statement endpoint.
    pub granularity: Granularity,
}

impl AttemptDescriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub const fn new(year: i32, period: ReportPeriod, granularity: Granularity) -> Self {
        Self {
            year,
            period,
            granularity,
        }
    }
}

impl fmt::Display for AttemptDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.year, self.period, self.granularity)
    }
}

/// The ordered set of combinations a sweep may try.
///
/// Enumeration is the Cartesian product with years outermost, then report
/// periods, then granularities. The order of each axis is preserved exactly
/// as given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptSpace {
    years: Vec<i32>,
    periods: Vec<ReportPeriod>,
    granularities: Vec<Granularity>,
}

impl AttemptSpace {
    /// Number of fiscal years covered by [`AttemptSpace::default`].
    pub const DEFAULT_YEARS_BACK: u32 = 3;

    /// Creates an attempt space from explicit axes.
    #[must_use]
    pub const fn new(
        years: Vec<i32>,
        periods: Vec<ReportPeriod>,
        granularities: Vec<Granularity>,
    ) -> Self {
        Self {
            years,
            periods,
            granularities,
        }
    }

    /// Creates the default ladder over `count` years ending at `latest`.
    ///
    /// The ladder stops early rather than wrapping past `i32::MIN`.
    #[must_use]
    pub fn trailing_years(latest: i32, count: u32) -> Self {
        let years = (0..count)
            .map_while(|offset| {
                i32::try_from(offset)
                    .ok()
                    .and_then(|offset| latest.checked_sub(offset))
            })
            .collect();
        Self::new(
            years,
            ReportPeriod::PRIORITY.to_vec(),
            Granularity::PRIORITY.to_vec(),
        )
    }

    /// Returns the fiscal years, most preferred first.
    #[must_use]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Returns the report periods, most preferred first.
    #[must_use]
    pub fn periods(&self) -> &[ReportPeriod] {
        &self.periods
    }

    /// Returns the granularities, most preferred first.
    #[must_use]
    pub fn granularities(&self) -> &[Granularity] {
        &self.granularities
    }

    /// Returns the number of combinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.years.len() * self.periods.len() * self.granularities.len()
    }

    /// Returns true if the space has no combinations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every descriptor in priority order.
    pub fn iter(&self) -> impl Iterator<Item = AttemptDescriptor> + '_ {
        self.years.iter().flat_map(move |&year| {
            self.periods.iter().flat_map(move |&period| {
                self.granularities
                    .iter()
                    .map(move |&granularity| AttemptDescriptor::new(year, period, granularity))
            })
        })
    }
}

impl Default for AttemptSpace {
    fn default() -> Self {
        Self::trailing_years(Utc::now().year(), Self::DEFAULT_YEARS_BACK)
    }
}

/// Result of a single attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The service returned a statement.
    Success {
        /// Number of line items received.
        rows: usize,
    },
    /// The service answered with a non-success status.
    Rejected {
        /// Status code reported by the service.
        status: String,
        /// Message reported by the service.
        message: String,
    },
    /// The request never produced a usable answer.
    Transport {
        /// Description of the failure.
        cause: String,
        /// Whether the attempt hit its time budget.
        timed_out: bool,
    },
}

impl AttemptOutcome {
    /// Returns true for [`AttemptOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true when the service reported its request quota as exhausted.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Rejected { status, .. } if status == "020")
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { rows } => write!(f, "found ({rows} rows)"),
            Self::Rejected { status, message } => write!(f, "rejected [{status}] {message}"),
            Self::Transport {
                cause,
                timed_out: true,
            } => write!(f, "timed out: {cause}"),
            Self::Transport { cause, .. } => write!(f, "transport error: {cause}"),
        }
    }
}

/// A descriptor paired with what happened when it was tried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// The combination that was tried.
    pub descriptor: AttemptDescriptor,
    /// What the service answered.
    pub outcome: AttemptOutcome,
}

impl fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.descriptor, self.outcome)
    }
}

/// Ordered log of every attempt made in one sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptTrace {
    records: Vec<AttemptRecord>,
}

impl AttemptTrace {
    /// Creates an empty trace.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn push(&mut self, descriptor: AttemptDescriptor, outcome: AttemptOutcome) {
        self.records.push(AttemptRecord {
            descriptor,
            outcome,
        });
    }

    /// Returns the number of attempts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no attempt was made.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records in attempt order.
    #[must_use]
    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.records.iter()
    }

    /// Returns the number of failed attempts.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.outcome.is_success())
            .count()
    }
}

impl fmt::Display for AttemptTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AttemptTrace {
    type Item = &'a AttemptRecord;
    type IntoIter = std::slice::Iter<'a, AttemptRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
