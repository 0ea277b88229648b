//! Signal classification and human-readable reasons.

use crate::domain::indicator::{IndicatorSnapshot, IndicatorValue};
use std::fmt;
use std::str::FromStr;

/// Ordinal trading signal. Ordering follows aggressiveness: `Wait < Watch < Buy < StrongBuy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Signal {
    Wait,
    Watch,
    Buy,
    StrongBuy,
}

impl Signal {
    pub const ALL: [Signal; 4] = [Signal::StrongBuy, Signal::Buy, Signal::Watch, Signal::Wait];

    /// ≥7 strong buy, ≥5 buy, ≥3 watch, otherwise wait.
    pub fn from_score(score: u8) -> Self {
        match score {
            7.. => Signal::StrongBuy,
            5..=6 => Signal::Buy,
            3..=4 => Signal::Watch,
            _ => Signal::Wait,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "strong buy",
            Signal::Buy => "buy",
            Signal::Watch => "watch",
            Signal::Wait => "wait",
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Signal::StrongBuy | Signal::Buy)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signal: {0}")]
pub struct UnknownSignal(pub String);

impl FromStr for Signal {
    type Err = UnknownSignal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "strong buy" => Ok(Signal::StrongBuy),
            "buy" => Ok(Signal::Buy),
            "watch" => Ok(Signal::Watch),
            "wait" => Ok(Signal::Wait),
            _ => Err(UnknownSignal(s.to_string())),
        }
    }
}

const OVERBOUGHT_RSI: f64 = 70.0;

/// Reasons behind a reading, in RSI / trend / momentum order.
pub fn explain(snapshot: &IndicatorSnapshot, return_pct: IndicatorValue) -> Vec<String> {
    let mut reasons = Vec::new();

    match snapshot.rsi.value() {
        Some(rsi) if rsi < 30.0 => {
            reasons.push("RSI very low (strongly oversold), strong opportunity".to_string())
        }
        Some(rsi) if rsi < 40.0 => {
            reasons.push("RSI low (moderately oversold), good opportunity".to_string())
        }
        Some(rsi) if rsi > OVERBOUGHT_RSI => {
            reasons.push("RSI high (overbought), correction risk".to_string())
        }
        _ => {}
    }

    if let (Some(short), Some(long)) = (snapshot.ma_short.value(), snapshot.ma_long.value()) {
        if short > long {
            reasons.push("uptrend confirmed (MA20 > MA50)".to_string());
        } else {
            reasons.push("downtrend or flat (MA20 <= MA50)".to_string());
        }
    }

    match return_pct.value() {
        Some(r) if r > 5.0 => reasons.push(format!("strong recent rise (+{:.1}%)", r)),
        Some(r) if r > 2.0 => reasons.push(format!("moderate rise (+{:.1}%)", r)),
        Some(r) if r < -5.0 => reasons.push(format!("strong recent drop ({:.1}%)", r)),
        _ => {}
    }

    if reasons.is_empty() {
        reasons.push("neutral market, no strong signal".to_string());
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorValue::{Available, Unavailable};

    fn snapshot(rsi: IndicatorValue, ma20: IndicatorValue, ma50: IndicatorValue) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi,
            ma_short: ma20,
            ma_long: ma50,
        }
    }

    #[test]
    fn buckets_partition_scores() {
        let expected = [
            Signal::Wait,
            Signal::Wait,
            Signal::Wait,
            Signal::Watch,
            Signal::Watch,
            Signal::Buy,
            Signal::Buy,
            Signal::StrongBuy,
            Signal::StrongBuy,
            Signal::StrongBuy,
            Signal::StrongBuy,
        ];
        for (score, signal) in expected.iter().enumerate() {
            assert_eq!(Signal::from_score(score as u8), *signal, "score {}", score);
        }
    }

    #[test]
    fn classification_is_monotone() {
        for score in 0..10u8 {
            assert!(Signal::from_score(score) <= Signal::from_score(score + 1));
        }
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for signal in Signal::ALL {
            assert_eq!(signal.label().parse::<Signal>().unwrap(), signal);
        }
        assert_eq!("STRONG_BUY".parse::<Signal>().unwrap(), Signal::StrongBuy);
        assert!("sell".parse::<Signal>().is_err());
    }

    #[test]
    fn is_buy() {
        assert!(Signal::StrongBuy.is_buy());
        assert!(Signal::Buy.is_buy());
        assert!(!Signal::Watch.is_buy());
        assert!(!Signal::Wait.is_buy());
    }

    #[test]
    fn explain_oversold_uptrend_rally() {
        let reasons = explain(
            &snapshot(Available(25.0), Available(110.0), Available(100.0)),
            Available(6.4),
        );
        assert_eq!(reasons.len(), 3);
        assert!(reasons[0].contains("strongly oversold"));
        assert!(reasons[1].contains("uptrend"));
        assert_eq!(reasons[2], "strong recent rise (+6.4%)");
    }

    #[test]
    fn explain_overbought_and_drop() {
        let reasons = explain(
            &snapshot(Available(75.0), Available(90.0), Available(100.0)),
            Available(-7.5),
        );
        assert!(reasons[0].contains("overbought"));
        assert!(reasons[1].contains("downtrend"));
        assert_eq!(reasons[2], "strong recent drop (-7.5%)");
    }

    #[test]
    fn explain_neutral_fallback() {
        let reasons = explain(&snapshot(Available(55.0), Unavailable, Unavailable), Available(1.0));
        assert_eq!(reasons, vec!["neutral market, no strong signal".to_string()]);
    }
}
