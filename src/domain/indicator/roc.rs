//! Trailing return over a fixed row count.
//!
//! return% = ((C[last] - C[len - n]) / C[len - n]) * 100
//!
//! The reference row is counted from the end including the latest row, so a
//! 14-row window compares against the close 13 changes back.
//! Unavailable when fewer than n rows exist or the reference close is 0.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue, RETURN_WINDOW};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_roc(bars: &[OhlcvBar], window: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    IndicatorSeries::from_values(IndicatorType::Roc(window), bars, roc_values(&closes, window))
}

/// Trailing return at every row, each over the rows up to and including it.
pub fn roc_values(closes: &[f64], window: usize) -> Vec<IndicatorValue> {
    (0..closes.len())
        .map(|i| trailing_return_values(&closes[..=i], window))
        .collect()
}

/// Return as of the latest bar.
pub fn trailing_return_pct(bars: &[OhlcvBar], window: usize) -> IndicatorValue {
    calculate_roc(bars, window).last()
}

pub fn trailing_return_values(closes: &[f64], window: usize) -> IndicatorValue {
    if window == 0 || closes.len() < window {
        return IndicatorValue::Unavailable;
    }

    let reference = closes[closes.len() - window];
    let latest = closes[closes.len() - 1];
    if reference == 0.0 {
        return IndicatorValue::Unavailable;
    }

    IndicatorValue::from(Some(((latest - reference) / reference) * 100.0))
}

/// The 14-row return used by the scorer.
pub fn default_return_pct(bars: &[OhlcvBar]) -> IndicatorValue {
    trailing_return_pct(bars, RETURN_WINDOW)
}
