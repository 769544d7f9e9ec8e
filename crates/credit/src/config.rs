//! Environment configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, Utc};
use credit_core::{AttemptSpace, CreditError, LogisticModel, Result};

/// Configuration for a credit lookup session.
#[derive(Clone, PartialEq, Eq)]
pub struct CreditConfig {
    /// Open DART credential.
    pub api_key: String,
    /// Alternative service host.
    pub base_url: Option<String>,
    /// Time budget per statement attempt.
    pub attempt_timeout: Duration,
    /// Number of fiscal years swept, ending at the current year.
    pub years_back: u32,
    /// Path to a JSON logistic model.
    pub model_path: Option<PathBuf>,
}

impl fmt::Debug for CreditConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("years_back", &self.years_back)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl CreditConfig {
    /// Credential variable.
    pub const API_KEY_VAR: &'static str = "DART_API_KEY";
    /// Service host variable.
    pub const BASE_URL_VAR: &'static str = "DART_BASE_URL";
    /// Per-attempt timeout variable, in milliseconds.
    pub const ATTEMPT_TIMEOUT_VAR: &'static str = "DART_ATTEMPT_TIMEOUT_MS";
    /// Fiscal-year window variable.
    pub const YEARS_BACK_VAR: &'static str = "CREDIT_YEARS_BACK";
    /// Classifier model path variable.
    pub const MODEL_PATH_VAR: &'static str = "CREDIT_MODEL_PATH";

    /// Largest accepted fiscal-year window.
    pub const MAX_YEARS_BACK: u32 = 10;

    const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 2_000;

    /// Creates a configuration with defaults for everything but the credential.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            attempt_timeout: Duration::from_millis(Self::DEFAULT_ATTEMPT_TIMEOUT_MS),
            years_back: AttemptSpace::DEFAULT_YEARS_BACK,
            model_path: None,
        }
    }

    /// Loads configuration from environment variables, reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var(Self::API_KEY_VAR).ok_or_else(|| {
            CreditError::MissingCredential(format!(
                "{} environment variable required",
                Self::API_KEY_VAR
            ))
        })?;

        let mut config = Self::new(api_key);
        config.base_url = var(Self::BASE_URL_VAR);
        config.model_path = var(Self::MODEL_PATH_VAR).map(PathBuf::from);

        if let Some(raw) = var(Self::ATTEMPT_TIMEOUT_VAR) {
            let millis: u64 = raw.parse().map_err(|_| {
                CreditError::InvalidParameter(format!(
                    "{} must be a whole number of milliseconds, got {raw:?}",
                    Self::ATTEMPT_TIMEOUT_VAR
                ))
            })?;
            config.attempt_timeout = Duration::from_millis(millis);
        }

        if let Some(raw) = var(Self::YEARS_BACK_VAR) {
            config.years_back = match raw.parse::<u32>() {
                Ok(n) if (1..=Self::MAX_YEARS_BACK).contains(&n) => n,
                _ => {
                    return Err(CreditError::InvalidParameter(format!(
                        "{} must be between 1 and {}, got {raw:?}",
                        Self::YEARS_BACK_VAR,
                        Self::MAX_YEARS_BACK
                    )));
                }
            };
        }

        Ok(config)
    }

    /// Returns the attempt space ending at the current calendar year.
    #[must_use]
    pub fn attempt_space(&self) -> AttemptSpace {
        AttemptSpace::trailing_years(Utc::now().year(), self.years_back)
    }

    /// Loads the configured classifier model, if any.
    pub fn load_model(&self) -> Result<Option<LogisticModel>> {
        self.model_path
            .as_ref()
            .map(LogisticModel::from_json_file)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CreditConfig::from_lookup(lookup(&[("DART_API_KEY", "abc")])).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.attempt_timeout, Duration::from_secs(2));
        assert_eq!(config.years_back, 3);
        assert!(config.base_url.is_none());
        assert!(config.load_model().unwrap().is_none());
        assert_eq!(config.attempt_space().len(), 18);
    }

    #[test]
    fn test_missing_credential() {
        assert!(matches!(
            CreditConfig::from_lookup(lookup(&[])),
            Err(CreditError::MissingCredential(_))
        ));
        assert!(matches!(
            CreditConfig::from_lookup(lookup(&[("DART_API_KEY", "  ")])),
            Err(CreditError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = CreditConfig::from_lookup(lookup(&[
            ("DART_API_KEY", "abc"),
            ("DART_BASE_URL", "http://127.0.0.1:9000"),
            ("DART_ATTEMPT_TIMEOUT_MS", "750"),
            ("CREDIT_YEARS_BACK", "2"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(config.attempt_timeout, Duration::from_millis(750));
        assert_eq!(config.attempt_space().years().len(), 2);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            CreditConfig::from_lookup(lookup(&[
                ("DART_API_KEY", "abc"),
                ("DART_ATTEMPT_TIMEOUT_MS", "soon"),
            ])),
            Err(CreditError::InvalidParameter(_))
        ));
        assert!(matches!(
            CreditConfig::from_lookup(lookup(&[("DART_API_KEY", "abc"), ("CREDIT_YEARS_BACK", "0")])),
            Err(CreditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_years_back_range() {
        let config = CreditConfig::from_lookup(lookup(&[
            ("DART_API_KEY", "abc"),
            ("CREDIT_YEARS_BACK", "10"),
        ]))
        .unwrap();
        assert_eq!(config.attempt_space().len(), 60);

        for raw in ["11", "3000000000", "-1"] {
            assert!(
                matches!(
                    CreditConfig::from_lookup(lookup(&[
                        ("DART_API_KEY", "abc"),
                        ("CREDIT_YEARS_BACK", raw),
                    ])),
                    Err(CreditError::InvalidParameter(_))
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", CreditConfig::new("secret-key"));
        assert!(!debug.contains("secret-key"));
    }
}
