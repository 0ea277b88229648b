//! Equal-split capital allocation across a strategy-filtered selection.

use crate::domain::analysis::AnalysisRecord;
use crate::domain::risk::{risk_reward_ratio, ExpectedOutcome, RiskLevels};
use crate::domain::signal::Signal;
use crate::domain::sizing::{size_position, PositionSize};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

pub const WATCHLIST_MIN_SCORE: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Strong buy signals only.
    StrongBuyOnly,
    /// Strong buy and buy signals.
    Buyable,
    /// Any record scoring at least [`WATCHLIST_MIN_SCORE`].
    Watchlist,
    /// Records whose signal is listed (any signal when empty) and whose score is at least `min_score`.
    Custom { signals: Vec<Signal>, min_score: u8 },
}

impl Strategy {
    pub fn matches(&self, record: &AnalysisRecord) -> bool {
        match self {
            Strategy::StrongBuyOnly => record.signal == Signal::StrongBuy,
            Strategy::Buyable => record.signal.is_buy(),
            Strategy::Watchlist => record.score >= WATCHLIST_MIN_SCORE,
            Strategy::Custom { signals, min_score } => {
                (signals.is_empty() || signals.contains(&record.signal))
                    && record.score >= *min_score
            }
        }
    }

    /// Matching records, keeping rank order.
    pub fn select<'a>(&self, records: &'a [AnalysisRecord]) -> Vec<&'a AnalysisRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::StrongBuyOnly => write!(f, "strong_buy"),
            Strategy::Buyable => write!(f, "buy"),
            Strategy::Watchlist => write!(f, "watch"),
            Strategy::Custom { signals, min_score } => {
                let names: Vec<&str> = signals.iter().map(|s| s.label()).collect();
                write!(f, "custom([{}], score >= {})", names.join(", "), min_score)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy: {0} (expected strong_buy, buy or watch)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strong_buy" | "strong-buy" | "strongbuy" => Ok(Strategy::StrongBuyOnly),
            "buy" => Ok(Strategy::Buyable),
            "watch" | "watchlist" => Ok(Strategy::Watchlist),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPosition {
    pub code: String,
    pub as_of: NaiveDate,
    pub price: f64,
    pub score: u8,
    pub signal: Signal,
    pub levels: RiskLevels,
    pub position: PositionSize,
    pub outcome: ExpectedOutcome,
}

impl PlannedPosition {
    /// Budget left unspent by whole-share rounding.
    pub fn slot_idle(&self, capital_per_position: f64) -> f64 {
        capital_per_position - self.position.invested
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioPlan {
    pub strategy: Strategy,
    pub total_capital: f64,
    pub capital_per_position: f64,
    pub positions: Vec<PlannedPosition>,
    pub total_invested: f64,
    pub idle_cash: f64,
    pub total_potential_gain: f64,
    pub total_potential_loss: f64,
    pub risk_reward: f64,
}

impl PortfolioPlan {
    pub fn empty(strategy: Strategy, total_capital: f64) -> Self {
        PortfolioPlan {
            strategy,
            total_capital,
            capital_per_position: 0.0,
            positions: Vec::new(),
            total_invested: 0.0,
            idle_cash: total_capital,
            total_potential_gain: 0.0,
            total_potential_loss: 0.0,
            risk_reward: 0.0,
        }
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Split `total_capital` evenly across the records matching `strategy`.
///
/// Each selected record is re-sized with the per-position budget; the record's
/// own default sizing is ignored. An empty selection yields [`PortfolioPlan::empty`].
pub fn allocate(records: &[AnalysisRecord], strategy: Strategy, total_capital: f64) -> PortfolioPlan {
    let selected = strategy.select(records);
    if selected.is_empty() {
        return PortfolioPlan::empty(strategy, total_capital);
    }

    let capital_per_position = total_capital / selected.len() as f64;

    let positions: Vec<PlannedPosition> = selected
        .into_iter()
        .map(|record| {
            let position = size_position(capital_per_position, record.price);
            PlannedPosition {
                code: record.code.clone(),
                as_of: record.as_of,
                price: record.price,
                score: record.score,
                signal: record.signal,
                levels: record.levels,
                position,
                outcome: record.levels.outcome(record.price, position.shares),
            }
        })
        .collect();

    let total_invested: f64 = positions.iter().map(|p| p.position.invested).sum();
    let total_potential_gain: f64 = positions.iter().map(|p| p.outcome.potential_gain).sum();
    let total_potential_loss: f64 = positions.iter().map(|p| p.outcome.potential_loss).sum();

    PortfolioPlan {
        strategy,
        total_capital,
        capital_per_position,
        positions,
        total_invested,
        idle_cash: total_capital - total_invested,
        total_potential_gain,
        total_potential_loss,
        risk_reward: risk_reward_ratio(total_potential_gain, total_potential_loss),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{IndicatorSnapshot, IndicatorValue};
    use crate::domain::risk::RiskRules;
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, proptest};

    fn record(code: &str, price: f64, score: u8) -> AnalysisRecord {
        let levels = RiskRules::default().levels(price);
        AnalysisRecord {
            code: code.to_string(),
            as_of: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            price,
            indicators: IndicatorSnapshot {
                rsi: IndicatorValue::Available(45.0),
                ma_short: IndicatorValue::Available(price),
                ma_long: IndicatorValue::Available(price),
            },
            return_pct: IndicatorValue::Available(0.0),
            score,
            signal: Signal::from_score(score),
            levels,
            position: PositionSize::default(),
            outcome: ExpectedOutcome::default(),
        }
    }

    fn ranked() -> Vec<AnalysisRecord> {
        vec![
            record("SNTS", 1_250_000.0, 9),
            record("SGBC", 1_250_000.0, 8),
            record("ORGT", 1_250_000.0, 7),
            record("BOAS", 1_250_000.0, 7),
            record("PALC", 9_000.0, 5),
            record("ETIT", 20.0, 3),
            record("CFAC", 800.0, 1),
        ]
    }

    #[test]
    fn even_split_example() {
        let plan = allocate(&ranked(), Strategy::StrongBuyOnly, 20_000_000.0);

        assert_eq!(plan.position_count(), 4);
        assert_eq!(plan.capital_per_position, 5_000_000.0);
        for p in &plan.positions {
            assert_eq!(p.position.shares, 4);
            assert_eq!(p.position.invested, 5_000_000.0);
            assert_eq!(p.slot_idle(plan.capital_per_position), 0.0);
        }
        assert_eq!(plan.total_invested, 20_000_000.0);
        assert_eq!(plan.idle_cash, 0.0);
        assert_relative_eq!(plan.risk_reward, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn selection_keeps_rank_order() {
        let plan = allocate(&ranked(), Strategy::Buyable, 1_000_000.0);
        let codes: Vec<&str> = plan.positions.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["SNTS", "SGBC", "ORGT", "BOAS", "PALC"]);
    }

    #[test]
    fn watchlist_uses_score_threshold() {
        let records = ranked();
        let selected = Strategy::Watchlist.select(&records);
        assert_eq!(selected.len(), 6);
        assert!(selected.iter().all(|r| r.score >= 3));
    }

    #[test]
    fn custom_filter() {
        let records = ranked();
        let strategy = Strategy::Custom {
            signals: vec![Signal::Buy, Signal::Watch],
            min_score: 4,
        };
        let codes: Vec<&str> = strategy.select(&records).iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["PALC"]);

        let any_signal = Strategy::Custom {
            signals: vec![],
            min_score: 8,
        };
        assert_eq!(any_signal.select(&records).len(), 2);
    }

    #[test]
    fn empty_selection_is_all_idle() {
        let records = vec![record("CFAC", 800.0, 1)];
        let plan = allocate(&records, Strategy::StrongBuyOnly, 20_000_000.0);

        assert!(plan.is_empty());
        assert_eq!(plan.idle_cash, 20_000_000.0);
        assert_eq!(plan.total_invested, 0.0);
        assert_eq!(plan.total_potential_gain, 0.0);
        assert_eq!(plan.total_potential_loss, 0.0);
        assert_eq!(plan.risk_reward, 0.0);
        assert!(!plan.risk_reward.is_nan());
    }

    #[test]
    fn unaffordable_positions_stay_idle() {
        let records = vec![record("SNTS", 1_250_000.0, 9), record("SGBC", 1_000.0, 9)];
        let plan = allocate(&records, Strategy::StrongBuyOnly, 1_000_000.0);

        assert_eq!(plan.positions[0].position.shares, 0);
        assert_eq!(plan.positions[1].position.shares, 500);
        assert_eq!(plan.total_invested, 500_000.0);
        assert_eq!(plan.idle_cash, 500_000.0);
    }

    #[test]
    fn strategy_parse_and_display() {
        assert_eq!("strong_buy".parse::<Strategy>().unwrap(), Strategy::StrongBuyOnly);
        assert_eq!("BUY".parse::<Strategy>().unwrap(), Strategy::Buyable);
        assert_eq!("watch".parse::<Strategy>().unwrap(), Strategy::Watchlist);
        assert!("sell".parse::<Strategy>().is_err());
        assert_eq!(Strategy::StrongBuyOnly.to_string(), "strong_buy");
        assert_eq!(Strategy::Buyable.to_string(), "buy");
    }

    proptest! {
        #[test]
        fn capital_is_conserved(
            prices in proptest::collection::vec(1.0f64..2_000_000.0, 0..12),
            capital in 1_000.0f64..1e9,
        ) {
            let records: Vec<AnalysisRecord> = prices
                .iter()
                .enumerate()
                .map(|(i, &p)| record(&format!("C{i}"), p, 8))
                .collect();
            let plan = allocate(&records, Strategy::StrongBuyOnly, capital);

            let invested: f64 = plan.positions.iter().map(|p| p.position.invested).sum();
            prop_assert!((invested + plan.idle_cash - capital).abs() <= capital * 1e-9);
            prop_assert!(invested <= capital * (1.0 + 1e-12));
            for p in &plan.positions {
                prop_assert!(p.position.invested <= plan.capital_per_position);
            }
        }
    }
}
