//! Per-instrument price history.

use crate::domain::ohlcv::OhlcvBar;

/// Chronologically sorted bars for one instrument, no duplicate dates.
///
/// The loader is responsible for ordering; the analyzer only reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub code: String,
    pub bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(code: impl Into<String>, bars: Vec<OhlcvBar>) -> Self {
        Self {
            code: code.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }
}
