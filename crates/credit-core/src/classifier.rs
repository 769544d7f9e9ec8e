//! Default-probability classification and risk grading.
//!
//! The classifier is an opaque collaborator behind [`DefaultClassifier`]:
//! four ratios in, a probability of default out. [`LogisticModel`] is a
//! serializable implementation whose weights are fitted elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::path::Path;

use crate::error::{CreditError, Result};

/// Predicts the probability that a company defaults.
pub trait DefaultClassifier: Send + Sync + Debug {
    /// Returns the name of this classifier.
    fn name(&self) -> &str;

    /// Predicts a probability in `[0, 1]` from
    /// `[debt_ratio, operating_margin, net_margin, return_on_assets]`, all in percent.
    fn predict(&self, features: &[f64; 4]) -> Result<f64>;
}

/// Logistic regression over the four credit ratios.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Model intercept.
    pub intercept: f64,
    /// One weight per feature, in feature order.
    pub coefficients: [f64; 4],
}

impl LogisticModel {
    /// Creates a model from its parameters.
    #[must_use]
    pub const fn new(intercept: f64, coefficients: [f64; 4]) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    /// Parses a model from JSON: `{"intercept": f64, "coefficients": [f64; 4]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| CreditError::Parse(format!("Invalid logistic model: {e}")))?;
        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(CreditError::Classifier(
                "Model parameters must be finite".to_string(),
            ));
        }
        Ok(model)
    }

    /// Loads a model from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CreditError::Classifier(format!("Failed to read model {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }
}

impl DefaultClassifier for LogisticModel {
    fn name(&self) -> &str {
        "logistic"
    }

    fn predict(&self, features: &[f64; 4]) -> Result<f64> {
        if features.iter().any(|f| !f.is_finite()) {
            return Err(CreditError::Classifier(format!(
                "Non-finite feature vector: {features:?}"
            )));
        }
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        let p = 1.0 / (1.0 + (-z).exp());
        if p.is_nan() {
            return Err(CreditError::Classifier("Prediction is NaN".to_string()));
        }
        Ok(p.clamp(0.0, 1.0))
    }
}

/// Traffic-light risk grade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskGrade {
    /// Default probability below 10%.
    Green,
    /// Default probability from 10% up to 70%.
    Orange,
    /// Default probability of 70% or more.
    Red,
}

impl RiskGrade {
    /// Upper bound (exclusive, percent) of the green band.
    pub const GREEN_BELOW: f64 = 10.0;
    /// Upper bound (exclusive, percent) of the orange band.
    pub const ORANGE_BELOW: f64 = 70.0;

    /// Grades a default probability given in percent.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent < Self::GREEN_BELOW {
            Self::Green
        } else if percent < Self::ORANGE_BELOW {
            Self::Orange
        } else {
            Self::Red
        }
    }

    /// Returns a short verdict for display.
    #[must_use]
    pub const fn verdict(&self) -> &'static str {
        match self {
            Self::Green => "safe",
            Self::Orange => "caution",
            Self::Red => "danger",
        }
    }
}

impl fmt::Display for RiskGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Green => "Green",
            Self::Orange => "Orange",
            Self::Red => "Red",
        };
        f.write_str(name)
    }
}

/// Classifier output for one company.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Default probability in percent.
    pub default_probability: f64,
    /// Risk grade derived from the probability.
    pub grade: RiskGrade,
}

impl RiskAssessment {
    /// Scores a feature vector with a classifier.
    pub fn assess(classifier: &dyn DefaultClassifier, features: &[f64; 4]) -> Result<Self> {
        let p = classifier.predict(features)?;
        if !(0.0..=1.0).contains(&p) {
            return Err(CreditError::Classifier(format!(
                "{} returned probability {p} outside [0, 1]",
                classifier.name()
            )));
        }
        let percent = p * 100.0;
        Ok(Self {
            default_probability: percent,
            grade: RiskGrade::from_percent(percent),
        })
    }
}
