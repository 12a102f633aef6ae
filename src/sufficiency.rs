use crate::models::Panel;
use log::info;

/// Returns a new panel without the symbols whose history is too short to
/// forecast `horizon` sessions.
///
/// Training reserves the final `horizon` rows as forecast inputs and needs
/// at least as many training rows again for a stable fit, so anything below
/// `2 * horizon` rows is excluded. Exclusion is silent by design: a thin
/// series is a property of the data, not a pipeline failure.
pub fn filter_sufficient(panel: &Panel, horizon: usize) -> Panel {
    let required = 2 * horizon;
    panel.retain_symbols(|symbol, series| {
        if series.len() < required {
            info!(
                "{}: {} rows of history, need at least {}, excluding from forecast",
                symbol,
                series.len(),
                required
            );
            return false;
        }
        true
    })
}
