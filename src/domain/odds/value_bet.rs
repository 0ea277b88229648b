use super::poisson::MatchPrediction;
use super::{parse_triple, Outcome};
use std::str::FromStr;

/// Bookmaker decimal odds per outcome; 0 or negative means "not quoted".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BookmakerOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl BookmakerOdds {
    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

impl FromStr for BookmakerOdds {
    type Err = String;

    /// `home,draw,away`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [home, draw, away] = parse_triple(s, "odds")?;
        Ok(BookmakerOdds::new(home, draw, away))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueBet {
    pub outcome: Outcome,
    pub bookmaker_odds: f64,
    pub fair_odds: f64,
    pub probability: f64,
    /// (bookmaker / fair − 1) × 100.
    pub value_pct: f64,
    /// (bookmaker × p − 1) × 100.
    pub expected_value_pct: f64,
}

/// Outcomes whose quoted odds beat the model's fair odds by more than `margin`.
///
/// Returned in home, draw, away order.
pub fn find_value_bets(prediction: &MatchPrediction, odds: &BookmakerOdds, margin: f64) -> Vec<ValueBet> {
    Outcome::ALL
        .iter()
        .filter_map(|&outcome| {
            let quoted = odds.get(outcome);
            let fair = prediction.fair_odds(outcome);
            if quoted > 0.0 && quoted > fair * margin {
                let probability = prediction.probability(outcome);
                Some(ValueBet {
                    outcome,
                    bookmaker_odds: quoted,
                    fair_odds: fair,
                    probability,
                    value_pct: (quoted / fair - 1.0) * 100.0,
                    expected_value_pct: (quoted * probability - 1.0) * 100.0,
                })
            } else {
                None
            }
        })
        .collect()
}
