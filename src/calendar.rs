use crate::errors::PipelineError;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Source of valid trading sessions for a market.
///
/// The pipeline never implements holiday or weekend logic itself; it asks an
/// injected calendar for the ordered sessions in a window and uses their
/// count as the forecast horizon. Swapping in an offline fixture is enough to
/// test the whole pipeline without any exchange data.
pub trait TradingCalendar {
    /// Ordered, deduplicated trading sessions in the inclusive window
    /// `[start, end]`.
    fn sessions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, PipelineError>;
}

/// Monday-to-Friday calendar minus a configured holiday set.
#[derive(Debug, Clone, Default)]
pub struct WeekdayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl WeekdayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Loads market holidays from a file with one `YYYY-MM-DD` date per
    /// line. Blank lines and lines starting with `#` are ignored.
    pub fn from_holiday_file(path: &Path) -> Result<Self, PipelineError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            PipelineError::Calendar(format!(
                "cannot read holiday file {}: {}",
                path.display(),
                err
            ))
        })?;

        let mut holidays = BTreeSet::new();
        for line in contents.lines() {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            let date = NaiveDate::parse_from_str(entry, "%Y-%m-%d").map_err(|_| {
                PipelineError::Calendar(format!(
                    "holiday file {} has a malformed date: {}",
                    path.display(),
                    entry
                ))
            })?;
            holidays.insert(date);
        }

        Ok(Self { holidays })
    }
}

impl TradingCalendar for WeekdayCalendar {
    fn sessions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, PipelineError> {
        check_window(start, end)?;

        let sessions = start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| {
                !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
                    && !self.holidays.contains(date)
            })
            .collect();
        Ok(sessions)
    }
}

/// Calendar backed by an explicit session list, e.g. a recorded exchange
/// schedule or a test fixture.
#[derive(Debug, Clone)]
pub struct FixedCalendar {
    sessions: Vec<NaiveDate>,
}

impl FixedCalendar {
    pub fn new(mut sessions: Vec<NaiveDate>) -> Self {
        sessions.sort();
        sessions.dedup();
        Self { sessions }
    }
}

impl TradingCalendar for FixedCalendar {
    fn sessions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, PipelineError> {
        check_window(start, end)?;

        Ok(self
            .sessions
            .iter()
            .copied()
            .filter(|date| *date >= start && *date <= end)
            .collect())
    }
}

fn check_window(start: NaiveDate, end: NaiveDate) -> Result<(), PipelineError> {
    if start > end {
        return Err(PipelineError::Calendar(format!(
            "window start {} is after end {}",
            start, end
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekday_calendar_skips_weekends_and_holidays() {
        // 2020-12-24 is a Thursday; 25th and 28th are declared holidays.
        let calendar = WeekdayCalendar::with_holidays([date(2020, 12, 25), date(2020, 12, 28)]);
        let sessions = calendar
            .sessions_between(date(2020, 12, 24), date(2020, 12, 30))
            .unwrap();

        assert_eq!(
            sessions,
            vec![date(2020, 12, 24), date(2020, 12, 29), date(2020, 12, 30)]
        );
    }

    #[test]
    fn weekday_calendar_includes_both_window_endpoints() {
        let calendar = WeekdayCalendar::new();
        // Monday through Friday of one week.
        let sessions = calendar
            .sessions_between(date(2021, 3, 1), date(2021, 3, 5))
            .unwrap();
        assert_eq!(sessions.len(), 5);
        assert_eq!(sessions[0], date(2021, 3, 1));
        assert_eq!(sessions[4], date(2021, 3, 5));
    }

    #[test]
    fn fixed_calendar_sorts_dedups_and_windows() {
        let calendar = FixedCalendar::new(vec![
            date(2021, 1, 6),
            date(2021, 1, 4),
            date(2021, 1, 4),
            date(2021, 1, 8),
        ]);
        let sessions = calendar
            .sessions_between(date(2021, 1, 4), date(2021, 1, 7))
            .unwrap();
        assert_eq!(sessions, vec![date(2021, 1, 4), date(2021, 1, 6)]);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let calendar = WeekdayCalendar::new();
        let result = calendar.sessions_between(date(2021, 2, 1), date(2021, 1, 1));
        assert!(matches!(result, Err(PipelineError::Calendar(_))));
    }
}
