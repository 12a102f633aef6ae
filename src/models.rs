use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One symbol's trading day. Rows with missing fields never become candles,
/// they are dropped during loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: i64,
}

/// Multi-symbol daily series, windowed at load time.
///
/// Per-symbol series are sorted by date ascending with duplicate dates
/// removed. A panel is built once per run and only transformed into new
/// panels afterwards, never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    series: BTreeMap<String, Vec<Candle>>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one symbol's series, sorting by date and keeping the first
    /// candle for any duplicated date.
    pub fn insert_series(&mut self, symbol: String, mut candles: Vec<Candle>) {
        candles.sort_by(|a, b| a.date.cmp(&b.date));
        candles.dedup_by(|a, b| a.date == b.date);
        self.series.insert(symbol, candles);
    }

    pub fn series(&self, symbol: &str) -> Option<&[Candle]> {
        self.series.get(symbol).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &[Candle])> {
        self.series
            .iter()
            .map(|(symbol, candles)| (symbol, candles.as_slice()))
    }

    pub fn symbols(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }

    pub fn symbol_count(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Returns a new panel containing only the symbols the predicate keeps.
    pub fn retain_symbols<F>(&self, mut keep: F) -> Panel
    where
        F: FnMut(&str, &[Candle]) -> bool,
    {
        let series = self
            .series
            .iter()
            .filter(|(symbol, candles)| keep(symbol, candles))
            .map(|(symbol, candles)| (symbol.clone(), candles.clone()))
            .collect();
        Panel { series }
    }
}

/// Predicted adjusted closes, one column per surviving symbol, aligned by
/// row position to the forecast session dates.
#[derive(Debug, Clone)]
pub struct ForecastTable {
    pub dates: Vec<NaiveDate>,
    pub columns: BTreeMap<String, Vec<f64>>,
}

/// Observed adjusted closes for the forecast window, pivoted wide. A `None`
/// cell means the symbol had no observation for that session.
#[derive(Debug, Clone)]
pub struct TruthTable {
    pub dates: Vec<NaiveDate>,
    pub columns: BTreeMap<String, Vec<Option<f64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(symbol: &str, date: NaiveDate, adjusted_close: f64) -> Candle {
        Candle {
            symbol: symbol.to_string(),
            date,
            open: adjusted_close,
            high: adjusted_close,
            low: adjusted_close,
            close: adjusted_close,
            adjusted_close,
            volume: 1_000,
        }
    }

    #[test]
    fn insert_series_sorts_and_dedups_dates() {
        let d1 = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();

        let mut panel = Panel::new();
        panel.insert_series(
            "AAA".to_string(),
            vec![
                candle("AAA", d2, 11.0),
                candle("AAA", d1, 10.0),
                candle("AAA", d2, 99.0),
            ],
        );

        let series = panel.series("AAA").expect("AAA series missing");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, d1);
        assert_eq!(series[1].date, d2);
        assert_eq!(series[1].adjusted_close, 11.0);
    }

    #[test]
    fn retain_symbols_produces_a_new_panel() {
        let d1 = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let mut panel = Panel::new();
        panel.insert_series("AAA".to_string(), vec![candle("AAA", d1, 10.0)]);
        panel.insert_series("BBB".to_string(), vec![candle("BBB", d1, 20.0)]);

        let filtered = panel.retain_symbols(|symbol, _| symbol == "BBB");
        assert_eq!(filtered.symbols(), vec!["BBB".to_string()]);
        assert_eq!(panel.symbol_count(), 2);
    }
}
