//! Fixed-percentage risk levels and expected outcome of a long position.

pub const DEFAULT_STOP_LOSS_PCT: f64 = -5.0;
pub const DEFAULT_TAKE_PROFIT_PCT: f64 = 10.0;
/// The trailing stop is not configurable.
pub const TRAILING_STOP_PCT: f64 = -3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskRules {
    /// Percentage offset from the reference price; negative for a long stop.
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

impl Default for RiskRules {
    fn default() -> Self {
        Self {
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
            take_profit_pct: DEFAULT_TAKE_PROFIT_PCT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub trailing_stop: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExpectedOutcome {
    pub potential_gain: f64,
    pub potential_loss: f64,
    pub risk_reward: f64,
}

impl RiskRules {
    pub fn levels(&self, price: f64) -> RiskLevels {
        RiskLevels {
            stop_loss: price * (1.0 + self.stop_loss_pct / 100.0),
            take_profit: price * (1.0 + self.take_profit_pct / 100.0),
            trailing_stop: price * (1.0 + TRAILING_STOP_PCT / 100.0),
        }
    }
}

impl RiskLevels {
    /// Gain at take-profit and loss at stop-loss for `shares` bought at `price`.
    pub fn outcome(&self, price: f64, shares: u64) -> ExpectedOutcome {
        let shares = shares as f64;
        let potential_gain = (self.take_profit - price) * shares;
        let potential_loss = (price - self.stop_loss) * shares;
        ExpectedOutcome {
            potential_gain,
            potential_loss,
            risk_reward: risk_reward_ratio(potential_gain, potential_loss),
        }
    }
}

/// |gain / loss|, or 0 when loss is exactly 0.
pub fn risk_reward_ratio(gain: f64, loss: f64) -> f64 {
    if loss == 0.0 {
        0.0
    } else {
        (gain / loss).abs()
    }
}
