use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// SMA3 scaled by the SMA3/SMA6 momentum ratio.
    #[default]
    MovingAverage,
    /// Least-squares line over the whole series, one period ahead.
    LinearRegression,
}

/// Thresholds and rates used by the analytics engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub sales_drop_mom_pct: f64,
    pub profit_margin_drop_pct: f64,
    pub employee_growth_ratio: f64,
    pub trend_band_pct: f64,
    pub revenue_loss_rate: f64,
    pub profit_loss_rate: f64,
    pub forecast_method: ForecastMethod,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            sales_drop_mom_pct: -10.0,
            profit_margin_drop_pct: -5.0,
            employee_growth_ratio: 1.5,
            trend_band_pct: 2.0,
            revenue_loss_rate: 0.10,
            profit_loss_rate: 0.15,
            forecast_method: ForecastMethod::MovingAverage,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a TOML file, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let config = Self::from_toml(&text)?;
                tracing::debug!(path = %path.display(), ?config, "loaded analytics config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AnalyticsConfig::from_toml("").unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn partial_file_overrides_named_keys() {
        let config = AnalyticsConfig::from_toml(
            "sales_drop_mom_pct = -7.5\nforecast_method = \"linear_regression\"\n",
        )
        .unwrap();
        assert_eq!(config.sales_drop_mom_pct, -7.5);
        assert_eq!(config.forecast_method, ForecastMethod::LinearRegression);
        assert_eq!(config.trend_band_pct, 2.0);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = AnalyticsConfig::from_toml("forecast_method = \"arima\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_path_means_defaults() {
        let config = AnalyticsConfig::load(None).unwrap();
        assert_eq!(config.employee_growth_ratio, 1.5);
    }
}
