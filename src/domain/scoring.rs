//! Composite 0–10 score from indicator readings.
//!
//! Rule groups are evaluated independently and summed, then clamped:
//!
//! | Group    | Condition             | Points |
//! |----------|-----------------------|--------|
//! | RSI      | RSI < 30              | +3     |
//! |          | 30 ≤ RSI < 40         | +2     |
//! |          | 40 ≤ RSI < 50         | +1     |
//! | Trend    | MA20 > MA50           | +2     |
//! |          | price > MA20          | +1     |
//! | Momentum | return > 5%           | +3     |
//! |          | 2% < return ≤ 5%      | +2     |
//! |          | 0% < return ≤ 2%      | +1     |
//! |          | return < −5%          | −1     |
//!
//! Unavailable readings contribute 0 points.

use crate::domain::indicator::{IndicatorSnapshot, IndicatorValue};

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub rsi: IndicatorValue,
    pub ma_short: IndicatorValue,
    pub ma_long: IndicatorValue,
    pub price: f64,
    pub return_pct: IndicatorValue,
}

impl ScoreInputs {
    pub fn new(snapshot: &IndicatorSnapshot, price: f64, return_pct: IndicatorValue) -> Self {
        Self {
            rsi: snapshot.rsi,
            ma_short: snapshot.ma_short,
            ma_long: snapshot.ma_long,
            price,
            return_pct,
        }
    }
}

/// Points contributed by each rule group before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub rsi: i32,
    pub trend: i32,
    pub price_above_ma: i32,
    pub momentum: i32,
}

impl ScoreBreakdown {
    pub fn raw_total(&self) -> i32 {
        self.rsi + self.trend + self.price_above_ma + self.momentum
    }

    pub fn score(&self) -> u8 {
        self.raw_total().clamp(MIN_SCORE as i32, MAX_SCORE as i32) as u8
    }
}

pub fn score_breakdown(inputs: &ScoreInputs) -> ScoreBreakdown {
    ScoreBreakdown {
        rsi: rsi_points(inputs.rsi),
        trend: trend_points(inputs.ma_short, inputs.ma_long),
        price_above_ma: price_points(inputs.price, inputs.ma_short),
        momentum: momentum_points(inputs.return_pct),
    }
}

pub fn score(inputs: &ScoreInputs) -> u8 {
    score_breakdown(inputs).score()
}

fn rsi_points(rsi: IndicatorValue) -> i32 {
    match rsi.value() {
        Some(r) if r < 30.0 => 3,
        Some(r) if r < 40.0 => 2,
        Some(r) if r < 50.0 => 1,
        _ => 0,
    }
}

fn trend_points(ma_short: IndicatorValue, ma_long: IndicatorValue) -> i32 {
    match (ma_short.value(), ma_long.value()) {
        (Some(short), Some(long)) if short > long => 2,
        _ => 0,
    }
}

fn price_points(price: f64, ma_short: IndicatorValue) -> i32 {
    match ma_short.value() {
        Some(short) if price > short => 1,
        _ => 0,
    }
}

fn momentum_points(return_pct: IndicatorValue) -> i32 {
    match return_pct.value() {
        Some(r) if r > 5.0 => 3,
        Some(r) if r > 2.0 => 2,
        Some(r) if r > 0.0 => 1,
        Some(r) if r < -5.0 => -1,
        _ => 0,
    }
}
