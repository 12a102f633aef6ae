use crate::errors::PipelineError;
use crate::models::{Candle, Panel};
use chrono::NaiveDate;
use log::{debug, info};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One CSV row before validation. Every field is optional so that rows with
/// gaps deserialize cleanly and can be dropped instead of failing the file.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Open")]
    open: Option<f64>,
    #[serde(rename = "High")]
    high: Option<f64>,
    #[serde(rename = "Low")]
    low: Option<f64>,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "Adjusted_close")]
    adjusted_close: Option<f64>,
    #[serde(rename = "Volume")]
    volume: Option<i64>,
}

/// Loads every per-symbol CSV file under `dir` into a panel, keeping only
/// rows with `start < date < end`.
///
/// The window is strictly exclusive on BOTH ends. That is asymmetric versus
/// the inclusive calendar window and is preserved on purpose: relaxing it
/// would change which rows train every model.
///
/// The symbol is the file name without its extension. Rows with any missing
/// or malformed field are dropped per row, never failing the file. Files are
/// parsed in parallel.
pub fn load_panel(dir: &Path, start: NaiveDate, end: NaiveDate) -> Result<Panel, PipelineError> {
    let entries = fs::read_dir(dir).map_err(|err| PipelineError::DataSource {
        path: dir.to_path_buf(),
        reason: err.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(PipelineError::DataSource {
            path: dir.to_path_buf(),
            reason: "no symbol files found".to_string(),
        });
    }

    let loaded: Vec<(String, Vec<Candle>)> = files
        .par_iter()
        .map(|path| load_symbol_file(path, start, end))
        .collect::<Result<Vec<_>, _>>()?;

    let mut panel = Panel::new();
    for (symbol, candles) in loaded {
        if candles.is_empty() {
            info!("{}: no rows inside {}..{}, skipping", symbol, start, end);
            continue;
        }
        panel.insert_series(symbol, candles);
    }

    Ok(panel)
}

fn load_symbol_file(
    path: &Path,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(String, Vec<Candle>), PipelineError> {
    let symbol = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| PipelineError::DataSource {
            path: path.to_path_buf(),
            reason: "file name is not valid UTF-8".to_string(),
        })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| PipelineError::DataSource {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    let mut candles = Vec::new();
    let mut dropped = 0usize;
    for record in reader.deserialize::<RawRow>() {
        let row = match record {
            Ok(row) => row,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };
        match complete_candle(&symbol, row) {
            Some(candle) if start < candle.date && candle.date < end => candles.push(candle),
            Some(_) => {}
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("{}: dropped {} incomplete rows", symbol, dropped);
    }

    Ok((symbol, candles))
}

fn complete_candle(symbol: &str, row: RawRow) -> Option<Candle> {
    let date = NaiveDate::parse_from_str(row.date?.trim(), "%Y-%m-%d").ok()?;
    Some(Candle {
        symbol: symbol.to_string(),
        date,
        open: row.open?,
        high: row.high?,
        low: row.low?,
        close: row.close?,
        adjusted_close: row.adjusted_close?,
        volume: row.volume?,
    })
}
