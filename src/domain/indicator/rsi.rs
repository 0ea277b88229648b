//! RSI (Relative Strength Index) indicator implementation.
//!
//! Average gain/loss are simple rolling means over the last n price changes
//! (not Wilder's recursive smoothing).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are unavailable (need n price changes).

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    IndicatorSeries::from_values(IndicatorType::Rsi(period), bars, rsi_values(&closes, period))
}

/// RSI over a raw close sequence, one value per input.
pub fn rsi_values(closes: &[f64], period: usize) -> Vec<IndicatorValue> {
    let mut values = vec![IndicatorValue::Unavailable; closes.len()];
    if period == 0 || closes.len() <= period {
        return values;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    // values[i] covers the changes ending at bar i: gains[i - period .. i]
    for i in period..closes.len() {
        let window = (i - period)..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        let rsi = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        };
        values[i] = IndicatorValue::from(Some(rsi));
    }

    values
}
