use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{CalculatorError, Result};

/// key the history list is stored under
pub const DEFAULT_STORAGE_KEY: &str = "loanCalculatorHistory";

/// calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CalculatorConfig {
    pub display: DisplayConfig,
    pub history: HistoryConfig,
    pub limits: ValidationLimits,
}

/// how digits are grouped when formatting currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// 12,34,567.00 (lakh/crore)
    Indian,
    /// 1,234,567.00
    Western,
}

/// display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    pub grouping: DigitGrouping,
    /// chrono strftime pattern for dates in tables and csv
    pub date_format: String,
}

/// history persistence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub storage_key: String,
    pub data_dir: PathBuf,
}

/// upper bounds checked by the collector; `None` disables a bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub max_principal: Option<f64>,
    pub max_annual_rate_percent: Option<f64>,
    pub max_term_months: Option<u32>,
}

/// one hundred years of monthly payments
pub const DEFAULT_MAX_TERM_MONTHS: u32 = 1200;

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_principal: None,
            max_annual_rate_percent: None,
            max_term_months: Some(DEFAULT_MAX_TERM_MONTHS),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            grouping: DigitGrouping::Indian,
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl CalculatorConfig {
    /// rupee amounts, lakh grouping, day-first dates
    pub fn indian_rupee() -> Self {
        Self::default()
    }

    /// dollar amounts, thousands grouping, month-first dates
    pub fn us_dollar() -> Self {
        Self {
            display: DisplayConfig {
                currency_symbol: "$".to_string(),
                grouping: DigitGrouping::Western,
                date_format: "%m/%d/%Y".to_string(),
            },
            ..Self::default()
        }
    }

    /// load from a json file; missing sections fall back to defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: CalculatorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history.storage_key.trim().is_empty() {
            return Err(invalid("history.storage_key must not be empty"));
        }

        let format = &self.display.date_format;
        if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(invalid(format!("display.date_format is not a valid pattern: {format:?}")));
        }

        if let Some(max) = self.limits.max_principal {
            if !(max > 0.0) {
                return Err(invalid("limits.max_principal must be positive"));
            }
        }
        if let Some(max) = self.limits.max_annual_rate_percent {
            if !(max > 0.0) {
                return Err(invalid("limits.max_annual_rate_percent must be positive"));
            }
        }
        if self.limits.max_term_months == Some(0) {
            return Err(invalid("limits.max_term_months must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> CalculatorError {
    CalculatorError::InvalidConfiguration {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CalculatorConfig::default().validate().is_ok());
        assert!(CalculatorConfig::us_dollar().validate().is_ok());
        assert_eq!(CalculatorConfig::indian_rupee().history.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CalculatorConfig::from_json(r#"{ "display": { "currency_symbol": "€" } }"#).unwrap();

        assert_eq!(config.display.currency_symbol, "€");
        assert_eq!(config.display.grouping, DigitGrouping::Indian);
        assert_eq!(config.history.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.limits.max_principal.is_none());
        assert_eq!(config.limits.max_term_months, Some(DEFAULT_MAX_TERM_MONTHS));
    }

    #[test]
    fn test_rejects_bad_date_format() {
        let err = CalculatorConfig::from_json(r#"{ "display": { "date_format": "%Q" } }"#).unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_empty_key_and_bad_limits() {
        let mut config = CalculatorConfig::default();
        config.history.storage_key = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = CalculatorConfig::default();
        config.limits.max_principal = Some(-1.0);
        assert!(config.validate().is_err());

        let mut config = CalculatorConfig::default();
        config.limits.max_term_months = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = CalculatorConfig::us_dollar();
        config.limits.max_term_months = Some(360);

        let parsed = CalculatorConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "display": { "grouping": "western" } }"#).unwrap();

        let config = CalculatorConfig::from_file(&path).unwrap();
        assert_eq!(config.display.grouping, DigitGrouping::Western);

        assert!(matches!(
            CalculatorConfig::from_file(dir.path().join("missing.json")),
            Err(CalculatorError::Io(_))
        ));
    }
}
