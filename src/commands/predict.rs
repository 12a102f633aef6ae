use crate::calendar::TradingCalendar;
use crate::config::ForecastRunConfig;
use crate::errors::PipelineError;
use crate::{dataset, forecaster, series_store, sufficiency};
use anyhow::Result;
use log::info;

/// Runs the full forecasting pipeline: load the historical panel, determine
/// the horizon from the calendar, filter and fit per symbol, then write the
/// predicted prices and (optionally) the observed prices for the same
/// sessions.
pub fn run(config: &ForecastRunConfig, calendar: &dyn TradingCalendar) -> Result<()> {
    config.validate()?;

    info!(
        "Loading daily series from {} for {}..{}",
        config.data_dir.display(),
        config.history_start,
        config.forecast_start
    );
    let panel = series_store::load_panel(
        &config.data_dir,
        config.history_start,
        config.forecast_start,
    )?;
    info!("Loaded {} symbols", panel.symbol_count());

    let sessions = calendar.sessions_between(config.forecast_start, config.forecast_end)?;
    let horizon = sessions.len();
    if horizon == 0 {
        return Err(PipelineError::InvalidHorizon(0).into());
    }
    info!(
        "Forecasting {} trading sessions ({}..{})",
        horizon, config.forecast_start, config.forecast_end
    );

    let panel = sufficiency::filter_sufficient(&panel, horizon);
    info!("{} symbols have enough history", panel.symbol_count());

    let forecasts = forecaster::forecast_panel(&panel, horizon)?;
    let table = dataset::assemble_predictions(&forecasts, &sessions)?;
    dataset::write_predictions(&table, &config.predictions_path)?;
    info!(
        "Predicted prices written to {}",
        config.predictions_path.display()
    );

    if config.with_truth {
        let truth_panel = series_store::load_panel(
            &config.data_dir,
            config.forecast_start,
            config.forecast_end,
        )?;
        let truth = dataset::assemble_truth(&truth_panel, &sessions);
        dataset::write_truth(&truth, &config.truth_path)?;
        info!("Observed prices written to {}", config.truth_path.display());
    }

    Ok(())
}
