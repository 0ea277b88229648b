//! Per-instrument analysis and ranking.
//!
//! Each series runs indicator snapshot → score → signal → risk levels → sizing
//! independently, so instruments are fanned out on rayon's pool. Results come
//! back in input order and are then stable-sorted by score, descending; ties keep
//! the input order.

use crate::domain::indicator::roc::default_return_pct;
use crate::domain::indicator::{IndicatorSnapshot, IndicatorValue, MIN_OBSERVATIONS};
use crate::domain::risk::{ExpectedOutcome, RiskLevels, RiskRules};
use crate::domain::scoring::{score, ScoreInputs};
use crate::domain::series::PriceSeries;
use crate::domain::signal::{explain, Signal};
use crate::domain::sizing::{allocation_budget, size_position, PositionSize};
use chrono::NaiveDate;
use rayon::prelude::*;

pub const DEFAULT_CAPITAL: f64 = 1_000_000.0;
pub const DEFAULT_POSITION_SIZE_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub capital: f64,
    pub rules: RiskRules,
    /// Share of `capital` sized into each instrument's default position.
    pub position_size_pct: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            capital: DEFAULT_CAPITAL,
            rules: RiskRules::default(),
            position_size_pct: DEFAULT_POSITION_SIZE_PCT,
        }
    }
}

impl AnalysisConfig {
    pub fn position_budget(&self) -> f64 {
        allocation_budget(self.capital, self.position_size_pct)
    }
}

/// One analyzed instrument as of its latest bar.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub code: String,
    pub as_of: NaiveDate,
    pub price: f64,
    pub indicators: IndicatorSnapshot,
    pub return_pct: IndicatorValue,
    pub score: u8,
    pub signal: Signal,
    pub levels: RiskLevels,
    pub position: PositionSize,
    pub outcome: ExpectedOutcome,
}

impl AnalysisRecord {
    pub fn reasons(&self) -> Vec<String> {
        explain(&self.indicators, self.return_pct)
    }

    pub fn explanation(&self) -> String {
        self.reasons().join(" | ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInstrument {
    pub code: String,
    pub bars: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    /// Ranked by score, descending.
    pub records: Vec<AnalysisRecord>,
    /// Instruments with too little history, in input order.
    pub skipped: Vec<SkippedInstrument>,
}

/// Analyze one series; `None` when it has fewer than [`MIN_OBSERVATIONS`] bars.
pub fn analyze_instrument(series: &PriceSeries, config: &AnalysisConfig) -> Option<AnalysisRecord> {
    if series.len() < MIN_OBSERVATIONS {
        return None;
    }
    let latest = series.latest()?;
    let price = latest.close;

    let indicators = IndicatorSnapshot::compute(&series.bars);
    let return_pct = default_return_pct(&series.bars);
    let score = score(&ScoreInputs::new(&indicators, price, return_pct));
    let signal = Signal::from_score(score);

    let levels = config.rules.levels(price);
    let position = size_position(config.position_budget(), price);
    let outcome = levels.outcome(price, position.shares);

    Some(AnalysisRecord {
        code: series.code.clone(),
        as_of: latest.date,
        price,
        indicators,
        return_pct,
        score,
        signal,
        levels,
        position,
        outcome,
    })
}

pub fn analyze_universe(universe: &[PriceSeries], config: &AnalysisConfig) -> AnalysisRun {
    let outcomes: Vec<Result<AnalysisRecord, SkippedInstrument>> = universe
        .par_iter()
        .map(|series| {
            analyze_instrument(series, config).ok_or_else(|| SkippedInstrument {
                code: series.code.clone(),
                bars: series.len(),
            })
        })
        .collect();

    let mut records = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(record) => records.push(record),
            Err(skip) => skipped.push(skip),
        }
    }

    rank_records(&mut records);
    AnalysisRun { records, skipped }
}

/// Stable sort by score, highest first.
pub fn rank_records(records: &mut [AnalysisRecord]) {
    records.sort_by(|a, b| b.score.cmp(&a.score));
}

impl AnalysisRun {
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_records(&self.records)
    }
}

/// Aggregate statistics over a ranked run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    pub analyzed: usize,
    pub strong_buy: usize,
    pub buy: usize,
    pub watch: usize,
    pub wait: usize,
    pub mean_price: Option<f64>,
    /// Mean over records whose RSI is available.
    pub mean_rsi: Option<f64>,
    pub mean_score: Option<f64>,
    pub best_code: Option<String>,
    pub max_score: Option<u8>,
}

impl RunSummary {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let count = |signal: Signal| records.iter().filter(|r| r.signal == signal).count();
        let rsis: Vec<f64> = records.iter().filter_map(|r| r.indicators.rsi.value()).collect();

        RunSummary {
            analyzed: records.len(),
            strong_buy: count(Signal::StrongBuy),
            buy: count(Signal::Buy),
            watch: count(Signal::Watch),
            wait: count(Signal::Wait),
            mean_price: mean(records.iter().map(|r| r.price)),
            mean_rsi: mean(rsis.into_iter()),
            mean_score: mean(records.iter().map(|r| r.score as f64)),
            best_code: records.first().map(|r| r.code.clone()),
            max_score: records.iter().map(|r| r.score).max(),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}
