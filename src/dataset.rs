use crate::errors::PipelineError;
use crate::models::{ForecastTable, Panel, TruthTable};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Joins per-symbol forecasts with the calendar sessions into the predicted
/// prices table. Columns align by row position; symbols removed by the
/// sufficiency filter are simply absent.
pub fn assemble_predictions(
    forecasts: &BTreeMap<String, Vec<f64>>,
    sessions: &[NaiveDate],
) -> Result<ForecastTable, PipelineError> {
    for (symbol, column) in forecasts {
        if column.len() != sessions.len() {
            return Err(PipelineError::Shape {
                symbol: symbol.clone(),
                len: column.len(),
                expected: sessions.len(),
            });
        }
    }

    Ok(ForecastTable {
        dates: sessions.to_vec(),
        columns: forecasts.clone(),
    })
}

/// Pivots the observed window into one row per session and one column per
/// symbol, holding adjusted closes.
///
/// Gap policy is lenient: a symbol with no observation for a session gets an
/// empty cell, matching the source data's holes instead of failing the run.
/// Every gap is logged.
pub fn assemble_truth(panel: &Panel, sessions: &[NaiveDate]) -> TruthTable {
    let mut columns = BTreeMap::new();

    for (symbol, series) in panel.iter() {
        let by_date: HashMap<NaiveDate, f64> = series
            .iter()
            .map(|candle| (candle.date, candle.adjusted_close))
            .collect();

        let column: Vec<Option<f64>> = sessions
            .iter()
            .map(|date| {
                let value = by_date.get(date).copied();
                if value.is_none() {
                    warn!("{}: no observation for {}, leaving an empty cell", symbol, date);
                }
                value
            })
            .collect();
        columns.insert(symbol.clone(), column);
    }

    TruthTable {
        dates: sessions.to_vec(),
        columns,
    }
}

/// Writes the predictions table as CSV: a `Date` column followed by one
/// column per symbol, no index column.
pub fn write_predictions(table: &ForecastTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("cannot create predictions file {}", path.display()))?;

    let mut header = vec!["Date".to_string()];
    header.extend(table.columns.keys().cloned());
    writer.write_record(&header)?;

    for (row, date) in table.dates.iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        for column in table.columns.values() {
            record.push(column[row].to_string());
        }
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("cannot write predictions file {}", path.display()))?;
    Ok(())
}

/// Writes the truth table as CSV with `Date` as the leading index column.
/// Missing observations render as empty cells.
pub fn write_truth(table: &TruthTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("cannot create truth file {}", path.display()))?;

    let mut header = vec!["Date".to_string()];
    header.extend(table.columns.keys().cloned());
    writer.write_record(&header)?;

    for (row, date) in table.dates.iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        for column in table.columns.values() {
            record.push(match column[row] {
                Some(value) => value.to_string(),
                None => String::new(),
            });
        }
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("cannot write truth file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candle;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn predictions_align_by_position() {
        let sessions = vec![date(2021, 1, 4), date(2021, 1, 5)];
        let mut forecasts = BTreeMap::new();
        forecasts.insert("AAA".to_string(), vec![10.0, 11.0]);

        let table = assemble_predictions(&forecasts, &sessions).unwrap();
        assert_eq!(table.dates, sessions);
        assert_eq!(table.columns["AAA"], vec![10.0, 11.0]);
    }

    #[test]
    fn mismatched_column_length_is_rejected() {
        let sessions = vec![date(2021, 1, 4), date(2021, 1, 5)];
        let mut forecasts = BTreeMap::new();
        forecasts.insert("AAA".to_string(), vec![10.0]);

        let result = assemble_predictions(&forecasts, &sessions);
        assert!(matches!(result, Err(PipelineError::Shape { .. })));
    }

    #[test]
    fn truth_gaps_become_empty_cells() {
        let d1 = date(2021, 1, 4);
        let d2 = date(2021, 1, 5);
        let mut panel = Panel::new();
        panel.insert_series(
            "AAA".to_string(),
            vec![Candle {
                symbol: "AAA".to_string(),
                date: d1,
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                adjusted_close: 9.5,
                volume: 100,
            }],
        );

        let table = assemble_truth(&panel, &[d1, d2]);
        assert_eq!(table.columns["AAA"], vec![Some(9.5), None]);
    }

    #[test]
    fn truth_csv_renders_gaps_as_empty_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("historical.csv");

        let mut columns = BTreeMap::new();
        columns.insert("AAA".to_string(), vec![Some(9.5), None]);
        let table = TruthTable {
            dates: vec![date(2021, 1, 4), date(2021, 1, 5)],
            columns,
        };

        write_truth(&table, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "Date,AAA");
        assert_eq!(lines[1], "2021-01-04,9.5");
        assert_eq!(lines[2], "2021-01-05,");
    }
}
