//! Report period and statement granularity definitions.
//!
//! This module defines [`ReportPeriod`] for selecting which periodic report to
//! request and [`Granularity`] for selecting the statement endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Periodic report selector used by the disclosure service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportPeriod {
    /// First-quarter report.
    FirstQuarter,
    /// Half-year (semiannual) report.
    HalfYear,
    /// Third-quarter report.
    ThirdQuarter,
    /// Annual business report.
    Annual,
}

impl ReportPeriod {
    /// Default search order: freshest interim report first, annual last.
    pub const PRIORITY: [Self; 3] = [Self::ThirdQuarter, Self::HalfYear, Self::Annual];

    /// Returns the report code sent as `reprt_code`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FirstQuarter => "11013",
            Self::HalfYear => "11012",
            Self::ThirdQuarter => "11014",
            Self::Annual => "11011",
        }
    }

    /// Returns a stable, human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FirstQuarter => "Q1",
            Self::HalfYear => "semiannual",
            Self::ThirdQuarter => "Q3",
            Self::Annual => "annual",
        }
    }

    /// Parses a report code back into a period.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "11013" => Some(Self::FirstQuarter),
            "11012" => Some(Self::HalfYear),
            "11014" => Some(Self::ThirdQuarter),
            "11011" => Some(Self::Annual),
            _ => None,
        }
    }

    /// Returns true for quarterly and semiannual reports.
    #[must_use]
    pub const fn is_interim(&self) -> bool {
        !matches!(self, Self::Annual)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Statement granularity, i.e. which statement endpoint is queried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Major-accounts endpoint: fewer rows, answers quickly.
    Aggregate,
    /// Full-accounts endpoint.
    Full,
}

impl Granularity {
    /// Default search order: aggregate before full.
    pub const PRIORITY: [Self; 2] = [Self::Aggregate, Self::Full];

    /// Returns the endpoint name on the disclosure service.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Aggregate => "fnlttMultiAcnt",
            Self::Full => "fnlttSinglAcnt",
        }
    }

    /// Returns a stable, human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Aggregate => "aggregate",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_codes_round_trip() {
        for period in [
            ReportPeriod::FirstQuarter,
            ReportPeriod::HalfYear,
            ReportPeriod::ThirdQuarter,
            ReportPeriod::Annual,
        ] {
            assert_eq!(ReportPeriod::from_code(period.code()), Some(period));
        }
        assert_eq!(ReportPeriod::from_code("99999"), None);
    }

    #[test]
    fn test_priority_orders() {
        assert_eq!(ReportPeriod::PRIORITY[0], ReportPeriod::ThirdQuarter);
        assert_eq!(ReportPeriod::PRIORITY[2], ReportPeriod::Annual);
        assert_eq!(Granularity::PRIORITY[0].endpoint(), "fnlttMultiAcnt");
        assert_eq!(Granularity::PRIORITY[1].endpoint(), "fnlttSinglAcnt");
    }

    #[test]
    fn test_interim() {
        assert!(ReportPeriod::ThirdQuarter.is_interim());
        assert!(!ReportPeriod::Annual.is_interim());
        assert_eq!(ReportPeriod::Annual.to_string(), "annual");
    }
}
