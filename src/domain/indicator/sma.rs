//! Simple moving average of closes.
//!
//! SMA(n)[i] = (C[i-n+1] + ... + C[i]) / n
//! Warmup: first (n-1) bars are unavailable.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], window: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    IndicatorSeries::from_values(IndicatorType::Sma(window), bars, sma_values(&closes, window))
}

pub fn sma_values(closes: &[f64], window: usize) -> Vec<IndicatorValue> {
    let mut values = vec![IndicatorValue::Unavailable; closes.len()];
    if window == 0 {
        return values;
    }

    for (i, trailing) in closes.windows(window).enumerate() {
        let mean = trailing.iter().sum::<f64>() / window as f64;
        values[i + window - 1] = IndicatorValue::from(Some(mean));
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                OhlcvBar::from_close(
                    "TEST",
                    NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                    close,
                )
            })
            .collect()
    }

    #[test]
    fn sma_basic() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let series = calculate_sma(&bars, 3);

        assert_eq!(series.values.len(), 5);
        assert_eq!(series.values[0].value, IndicatorValue::Unavailable);
        assert_eq!(series.values[1].value, IndicatorValue::Unavailable);
        assert_eq!(series.values[2].value, IndicatorValue::Available(2.0));
        assert_eq!(series.values[3].value, IndicatorValue::Available(3.0));
        assert_eq!(series.values[4].value, IndicatorValue::Available(4.0));
    }

    #[test]
    fn sma_dates_follow_bars() {
        let bars = make_bars(&[1.0, 2.0]);
        let series = calculate_sma(&bars, 1);
        assert_eq!(series.values[1].date, bars[1].date);
        assert_eq!(series.indicator_type, IndicatorType::Sma(1));
    }

    #[test]
    fn sma_window_longer_than_series() {
        let values = sma_values(&[1.0, 2.0, 3.0], 5);
        assert!(values.iter().all(|v| v.value().is_none()));
    }

    #[test]
    fn sma_zero_window() {
        let values = sma_values(&[1.0, 2.0, 3.0], 0);
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| v.value().is_none()));
    }

    #[test]
    fn sma_window_equal_to_length() {
        let values = sma_values(&[2.0, 4.0, 6.0, 8.0], 4);
        assert_eq!(values[3], IndicatorValue::Available(5.0));
    }

    #[test]
    fn overflowing_sum_is_unavailable() {
        let values = sma_values(&[f64::MAX, f64::MAX, 1.0], 2);
        assert_eq!(values[1], IndicatorValue::Unavailable);
        assert!(values[2].value().is_some());
    }
}
