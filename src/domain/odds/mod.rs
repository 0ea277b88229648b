//! Poisson match model, value-bet screening and matched-betting arithmetic.
//!
//! Independent of the equity pipeline; shares only the error and config layers.

pub mod matched_bet;
pub mod poisson;
pub mod value_bet;

use std::fmt;

pub use matched_bet::{matched_bet, MatchedBet};
pub use poisson::{league_average_goals, poisson_pmf, MatchModel, MatchPrediction, TeamRecord};
pub use value_bet::{find_value_bets, BookmakerOdds, ValueBet};

pub const DEFAULT_HOME_ADVANTAGE: f64 = 1.10;
pub const DEFAULT_MAX_GOALS: u32 = 10;
/// Largest scoreline grid side; past it every pmf cell is negligible.
pub const MAX_GOALS_LIMIT: u32 = 100;
pub const DEFAULT_VALUE_MARGIN: f64 = 1.05;
pub const DEFAULT_COMMISSION: f64 = 0.02;

/// Fair odds reported for an outcome with zero probability.
pub const FAIR_ODDS_SENTINEL: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Home => "home",
            Outcome::Draw => "draw",
            Outcome::Away => "away",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OddsError {
    #[error("lay odds ({lay_odds}) must exceed commission ({commission})")]
    LayOddsBelowCommission { lay_odds: f64, commission: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}

/// Three comma-separated numbers, as typed on a command line.
pub(crate) fn parse_triple(s: &str, what: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected three comma-separated {what}, got {s:?}"));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|e| format!("invalid {what} {part:?}: {e}"))?;
    }
    Ok(out)
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64, OddsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OddsError::NonFinite { name, value })
    }
}
