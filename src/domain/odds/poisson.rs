use super::{parse_triple, Outcome, DEFAULT_HOME_ADVANTAGE, DEFAULT_MAX_GOALS, FAIR_ODDS_SENTINEL, MAX_GOALS_LIMIT};
use std::str::FromStr;

/// Goals per game assumed when no team has played yet.
pub const DEFAULT_LEAGUE_AVERAGE: f64 = 1.4;

/// P(X = k) for X ~ Poisson(lambda); 0 for negative or non-finite lambda.
pub fn poisson_pmf(lambda: f64, k: u32) -> f64 {
    if !lambda.is_finite() || lambda < 0.0 {
        return 0.0;
    }
    let factorial: f64 = (1..=k).map(f64::from).product();
    let p = lambda.powi(k as i32) * (-lambda).exp() / factorial;
    if p.is_finite() { p } else { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeamRecord {
    pub played: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamRecord {
    pub fn new(played: u32, goals_for: u32, goals_against: u32) -> Self {
        Self {
            played,
            goals_for,
            goals_against,
        }
    }

    /// Goals scored per game; `None` before the first game.
    pub fn attack(&self) -> Option<f64> {
        (self.played > 0).then(|| self.goals_for as f64 / self.played as f64)
    }

    /// Goals conceded per game; `None` before the first game.
    pub fn defence(&self) -> Option<f64> {
        (self.played > 0).then(|| self.goals_against as f64 / self.played as f64)
    }
}

impl FromStr for TeamRecord {
    type Err = String;

    /// `played,goals_for,goals_against`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [played, goals_for, goals_against] = parse_triple(s, "counts")?;
        let count = |v: f64| {
            if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
                Ok(v as u32)
            } else {
                Err(format!("counts must be non-negative integers, got {v}"))
            }
        };
        Ok(TeamRecord::new(count(played)?, count(goals_for)?, count(goals_against)?))
    }
}

/// Σgoals_for / Σplayed across the table.
pub fn league_average_goals(teams: &[TeamRecord]) -> f64 {
    let goals: u64 = teams.iter().map(|t| t.goals_for as u64).sum();
    let played: u64 = teams.iter().map(|t| t.played as u64).sum();
    if played == 0 {
        DEFAULT_LEAGUE_AVERAGE
    } else {
        goals as f64 / played as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchModel {
    /// Multiplier on the home side's expected goals.
    pub home_advantage: f64,
    /// Scorelines are enumerated for 0..max_goals goals per side, capped at [`MAX_GOALS_LIMIT`].
    pub max_goals: u32,
}

impl Default for MatchModel {
    fn default() -> Self {
        Self {
            home_advantage: DEFAULT_HOME_ADVANTAGE,
            max_goals: DEFAULT_MAX_GOALS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPrediction {
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub p_home: f64,
    pub p_draw: f64,
    pub p_away: f64,
    /// (home goals, away goals) of the highest-probability cell.
    pub most_likely: (u32, u32),
}

impl MatchPrediction {
    pub fn probability(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.p_home,
            Outcome::Draw => self.p_draw,
            Outcome::Away => self.p_away,
        }
    }

    /// 1 / p, or [`FAIR_ODDS_SENTINEL`] when p is 0.
    pub fn fair_odds(&self, outcome: Outcome) -> f64 {
        let p = self.probability(outcome);
        if p > 0.0 { 1.0 / p } else { FAIR_ODDS_SENTINEL }
    }

    pub fn scoreline(&self) -> String {
        format!("{}-{}", self.most_likely.0, self.most_likely.1)
    }
}

impl MatchModel {
    /// Expected goals for each side, or `None` if either side has no games.
    pub fn expected_goals(&self, home: &TeamRecord, away: &TeamRecord, league_average: f64) -> Option<(f64, f64)> {
        let (att_home, def_home) = (home.attack()?, home.defence()?);
        let (att_away, def_away) = (away.attack()?, away.defence()?);

        if league_average > 0.0 {
            Some((
                att_home / league_average * def_away * self.home_advantage,
                att_away / league_average * def_home,
            ))
        } else {
            Some((att_home * self.home_advantage, att_away))
        }
    }

    pub fn predict(&self, home: &TeamRecord, away: &TeamRecord, league_average: f64) -> Option<MatchPrediction> {
        let (lambda_home, lambda_away) = self.expected_goals(home, away, league_average)?;

        let grid = self.max_goals.min(MAX_GOALS_LIMIT);
        let home_pmf: Vec<f64> = (0..grid).map(|k| poisson_pmf(lambda_home, k)).collect();
        let away_pmf: Vec<f64> = (0..grid).map(|k| poisson_pmf(lambda_away, k)).collect();

        let (mut p_home, mut p_draw, mut p_away) = (0.0, 0.0, 0.0);
        let mut best = 0.0;
        let mut most_likely = (1, 1);

        for (h, &ph) in home_pmf.iter().enumerate() {
            for (a, &pa) in away_pmf.iter().enumerate() {
                let p = ph * pa;
                if p > best {
                    best = p;
                    most_likely = (h as u32, a as u32);
                }
                match h.cmp(&a) {
                    std::cmp::Ordering::Greater => p_home += p,
                    std::cmp::Ordering::Equal => p_draw += p,
                    std::cmp::Ordering::Less => p_away += p,
                }
            }
        }

        // the grid is truncated, so renormalise over the mass it covers
        let total = p_home + p_draw + p_away;
        if total > 0.0 {
            p_home /= total;
            p_draw /= total;
            p_away /= total;
        }

        Some(MatchPrediction {
            lambda_home,
            lambda_away,
            p_home,
            p_draw,
            p_away,
            most_likely,
        })
    }
}
