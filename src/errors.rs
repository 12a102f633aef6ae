use std::path::PathBuf;
use thiserror::Error;

/// Failures the forecasting pipeline can surface to a caller.
///
/// Missing observations during truth-table assembly are deliberately not an
/// error: the cell is left empty and a warning is logged instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input directory is missing, unreadable, or yields no symbol files.
    #[error("data source {}: {reason}", .path.display())]
    DataSource { path: PathBuf, reason: String },

    /// The requested forecast window contains no trading sessions.
    #[error("forecast horizon must be positive (got {0})")]
    InvalidHorizon(i64),

    /// A series is too short to train on. The sufficiency filter removes
    /// such symbols before forecasting, so this is a defensive check.
    #[error("{rows} rows of history cannot train a {horizon}-session forecast")]
    InsufficientData { rows: usize, horizon: usize },

    /// The calendar window or holiday configuration is unusable.
    #[error("calendar error: {0}")]
    Calendar(String),

    /// A forecast column does not line up with the session dates.
    #[error("column {symbol} has {len} values but the horizon has {expected} sessions")]
    Shape {
        symbol: String,
        len: usize,
        expected: usize,
    },
}
