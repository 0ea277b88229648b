//! Price history access port trait.

use crate::domain::error::TradescoreError;
use crate::domain::series::PriceSeries;

pub trait DataPort {
    /// Instrument codes available from this source, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, TradescoreError>;

    /// Full history of one instrument, ascending by date with unique dates.
    fn fetch_series(&self, code: &str) -> Result<PriceSeries, TradescoreError>;

    /// Every listed instrument. Sources that fail to load are logged and left out.
    fn fetch_universe(&self) -> Result<Vec<PriceSeries>, TradescoreError> {
        Ok(self
            .list_symbols()?
            .iter()
            .filter_map(|code| keep_loaded(code, self.fetch_series(code)))
            .collect())
    }
}

/// The series if it loaded with at least one row; otherwise logs why it is left out.
pub fn keep_loaded(code: &str, loaded: Result<PriceSeries, TradescoreError>) -> Option<PriceSeries> {
    match loaded {
        Ok(series) if series.is_empty() => {
            tracing::warn!(code = %code, "no rows, skipping");
            None
        }
        Ok(series) => Some(series),
        Err(err) => {
            tracing::warn!(code = %code, error = %err, "failed to load, skipping");
            None
        }
    }
}
