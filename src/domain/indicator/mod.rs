//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorValue`: a reading that is either available or explicitly unavailable
//! - `IndicatorPoint`: a single dated point in an indicator time series
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values
//! - `IndicatorSnapshot`: the latest RSI / short MA / long MA of one series

pub mod rsi;
pub mod sma;
pub mod roc;

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::fmt;

pub const RSI_PERIOD: usize = 14;
pub const MA_SHORT_WINDOW: usize = 20;
pub const MA_LONG_WINDOW: usize = 50;
pub const RETURN_WINDOW: usize = 14;

/// Minimum observations needed by the longest indicator window.
pub const MIN_OBSERVATIONS: usize = MA_LONG_WINDOW;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Available(f64),
    /// Not enough trailing observations to compute.
    Unavailable,
}

impl IndicatorValue {
    pub fn value(self) -> Option<f64> {
        match self {
            IndicatorValue::Available(v) => Some(v),
            IndicatorValue::Unavailable => None,
        }
    }
}

impl From<Option<f64>> for IndicatorValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => IndicatorValue::Available(v),
            _ => IndicatorValue::Unavailable,
        }
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorValue::Available(v) => write!(f, "{:.2}", v),
            IndicatorValue::Unavailable => write!(f, "n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    Roc(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub(crate) fn from_values(
        indicator_type: IndicatorType,
        bars: &[OhlcvBar],
        values: Vec<IndicatorValue>,
    ) -> Self {
        let values = bars
            .iter()
            .zip(values)
            .map(|(bar, value)| IndicatorPoint {
                date: bar.date,
                value,
            })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    /// Value at the last point; unavailable for an empty series.
    pub fn last(&self) -> IndicatorValue {
        self.values
            .last()
            .map(|p| p.value)
            .unwrap_or(IndicatorValue::Unavailable)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Roc(period) => write!(f, "ROC({})", period),
        }
    }
}

/// Latest indicator readings of one price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi: IndicatorValue,
    pub ma_short: IndicatorValue,
    pub ma_long: IndicatorValue,
}

impl IndicatorSnapshot {
    /// RSI(14), MA(20) and MA(50) over the full history, read at the last bar.
    pub fn compute(bars: &[OhlcvBar]) -> Self {
        Self {
            rsi: rsi::calculate_rsi(bars, RSI_PERIOD).last(),
            ma_short: sma::calculate_sma(bars, MA_SHORT_WINDOW).last(),
            ma_long: sma::calculate_sma(bars, MA_LONG_WINDOW).last(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvBar::from_close("TEST", start + chrono::Duration::days(i as i64), c))
            .collect()
    }

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
        assert_eq!(IndicatorType::Roc(14).to_string(), "ROC(14)");
    }

    #[test]
    fn value_from_option_rejects_non_finite() {
        assert_eq!(IndicatorValue::from(Some(1.5)), IndicatorValue::Available(1.5));
        assert_eq!(IndicatorValue::from(Some(f64::NAN)), IndicatorValue::Unavailable);
        assert_eq!(IndicatorValue::from(Some(f64::INFINITY)), IndicatorValue::Unavailable);
        assert_eq!(IndicatorValue::from(None), IndicatorValue::Unavailable);
    }

    #[test]
    fn value_display() {
        assert_eq!(IndicatorValue::Available(42.126).to_string(), "42.13");
        assert_eq!(IndicatorValue::Unavailable.to_string(), "n/a");
    }

    #[test]
    fn empty_series_last_is_unavailable() {
        let series = IndicatorSeries {
            indicator_type: IndicatorType::Sma(20),
            values: vec![],
        };
        assert_eq!(series.last(), IndicatorValue::Unavailable);
    }

    #[test]
    fn snapshot_short_history_has_only_rsi_and_short_ma() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let snap = IndicatorSnapshot::compute(&make_bars(&closes));
        assert!(snap.rsi.value().is_some());
        assert!(snap.ma_short.value().is_some());
        assert_eq!(snap.ma_long, IndicatorValue::Unavailable);
    }

    #[test]
    fn snapshot_full_history() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let snap = IndicatorSnapshot::compute(&make_bars(&closes));
        // mean of 130..=149
        assert_eq!(snap.ma_short, IndicatorValue::Available(139.5));
        // mean of 100..=149
        assert_eq!(snap.ma_long, IndicatorValue::Available(124.5));
        assert_eq!(snap.rsi, IndicatorValue::Available(100.0));
    }
}
