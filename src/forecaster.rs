use crate::errors::PipelineError;
use crate::models::Panel;
use indicatif::{ProgressBar, ProgressStyle};
use log::error;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Single-feature ordinary least squares fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    /// Closed-form OLS over paired observations: slope = cov(x, y) / var(x),
    /// intercept = mean(y) - slope * mean(x). No regularization.
    ///
    /// A feature column with zero variance has no unique OLS solution; the
    /// fit degrades to the label mean so a constant series forecasts its
    /// constant instead of NaN.
    pub fn fit(features: &[f64], labels: &[f64]) -> Self {
        let x_mean = features.iter().mean();
        let y_mean = labels.iter().mean();

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (x, y) in features.iter().zip(labels.iter()) {
            sxx += (x - x_mean) * (x - x_mean);
            sxy += (x - x_mean) * (y - y_mean);
        }

        if sxx == 0.0 {
            return Self {
                slope: 0.0,
                intercept: y_mean,
            };
        }

        let slope = sxy / sxx;
        Self {
            slope,
            intercept: y_mean - slope * x_mean,
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Projects `horizon` future values from one symbol's adjusted closes.
///
/// The label column is the series shifted back by `horizon` positions
/// (label[i] = values[i + horizon]), the training set is every row that has
/// a label, and the forecast inputs are the final `horizon` observed values,
/// predicted in date order.
pub fn forecast_series(values: &[f64], horizon: usize) -> Result<Vec<f64>, PipelineError> {
    if horizon == 0 {
        return Err(PipelineError::InvalidHorizon(0));
    }
    if values.len() <= horizon {
        return Err(PipelineError::InsufficientData {
            rows: values.len(),
            horizon,
        });
    }

    let train = values.len() - horizon;
    let features = &values[..train];
    let labels = &values[horizon..];
    let model = LinearModel::fit(features, labels);

    Ok(values[train..].iter().map(|&x| model.predict(x)).collect())
}

/// Fits one independent model per symbol and returns every symbol's
/// `horizon`-length forecast. Symbols share no state, so fitting runs as a
/// rayon parallel map.
pub fn forecast_panel(
    panel: &Panel,
    horizon: usize,
) -> Result<BTreeMap<String, Vec<f64>>, PipelineError> {
    if horizon == 0 {
        return Err(PipelineError::InvalidHorizon(0));
    }

    let entries: Vec<_> = panel.iter().collect();
    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let forecasts = entries
        .par_iter()
        .map(|(symbol, series)| {
            let values: Vec<f64> = series.iter().map(|c| c.adjusted_close).collect();
            let result = forecast_series(&values, horizon);
            pb.inc(1);
            match result {
                Ok(forecast) => Ok(((*symbol).clone(), forecast)),
                Err(err) => {
                    error!("{}: {}", symbol, err);
                    Err(err)
                }
            }
        })
        .collect::<Result<BTreeMap<_, _>, _>>();
    pb.finish_and_clear();

    forecasts
}
