use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Typed configuration for one forecast run. Replaces any process-wide state:
/// every parameter the pipeline needs arrives through this struct.
#[derive(Debug, Clone)]
pub struct ForecastRunConfig {
    /// Directory of per-symbol daily price CSV files.
    pub data_dir: PathBuf,
    /// First day of the historical training window.
    pub history_start: NaiveDate,
    /// First day of the forecast window, one day after the last training day.
    pub forecast_start: NaiveDate,
    /// Last day of the forecast window.
    pub forecast_end: NaiveDate,
    /// Whether to also write the observed prices for the forecast window.
    pub with_truth: bool,
    pub predictions_path: PathBuf,
    pub truth_path: PathBuf,
}

impl ForecastRunConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        data_dir: PathBuf,
        history_start: &str,
        forecast_start: &str,
        forecast_end: &str,
        with_truth: bool,
        predictions_path: PathBuf,
        truth_path: PathBuf,
    ) -> Result<Self> {
        let config = Self {
            data_dir,
            history_start: parse_date("history start", history_start)?,
            forecast_start: parse_date("forecast start", forecast_start)?,
            forecast_end: parse_date("forecast end", forecast_end)?,
            with_truth,
            predictions_path,
            truth_path,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_start >= self.forecast_start {
            return Err(anyhow!(
                "history start ({}) must be before forecast start ({})",
                self.history_start,
                self.forecast_start
            ));
        }
        if self.forecast_start > self.forecast_end {
            return Err(anyhow!(
                "forecast start ({}) must not be after forecast end ({})",
                self.forecast_start,
                self.forecast_end
            ));
        }
        Ok(())
    }
}

pub fn parse_date(label: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("{} must be a date in YYYY-MM-DD format (value: {})", label, raw))
}
