use super::{require_finite, OddsError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedBet {
    pub lay_stake: f64,
    pub liability: f64,
    pub if_back_wins: f64,
    pub if_back_loses: f64,
    pub guaranteed_profit: f64,
    /// Guaranteed profit as a percentage of the back stake.
    pub conversion_pct: f64,
}

/// Lay stake that equalises the two outcomes of a back bet, net of exchange commission.
pub fn matched_bet(back_stake: f64, back_odds: f64, lay_odds: f64, commission: f64) -> Result<MatchedBet, OddsError> {
    let back_stake = require_finite("back stake", back_stake)?;
    let back_odds = require_finite("back odds", back_odds)?;
    let lay_odds = require_finite("lay odds", lay_odds)?;
    let commission = require_finite("commission", commission)?;

    let denominator = lay_odds - commission;
    if denominator <= 0.0 {
        return Err(OddsError::LayOddsBelowCommission { lay_odds, commission });
    }

    let lay_stake = back_stake * back_odds / denominator;
    let liability = lay_stake * (lay_odds - 1.0);
    let if_back_wins = back_stake * (back_odds - 1.0) - liability;
    let if_back_loses = lay_stake * (1.0 - commission);
    let guaranteed_profit = if_back_wins.min(if_back_loses);
    let conversion_pct = if back_stake > 0.0 {
        guaranteed_profit / back_stake * 100.0
    } else {
        0.0
    };

    Ok(MatchedBet {
        lay_stake,
        liability,
        if_back_wins,
        if_back_loses,
        guaranteed_profit,
        conversion_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn qualifying_bet() {
        let bet = matched_bet(100.0, 3.0, 3.1, 0.02).unwrap();
        let lay = 300.0 / 3.08;
        assert_relative_eq!(bet.lay_stake, lay, epsilon = 1e-9);
        assert_relative_eq!(bet.liability, lay * 2.1, epsilon = 1e-9);
        assert_relative_eq!(bet.if_back_wins, 200.0 - lay * 2.1, epsilon = 1e-9);
        assert_relative_eq!(bet.if_back_loses, lay * 0.98, epsilon = 1e-9);
        assert_eq!(bet.guaranteed_profit, bet.if_back_wins);
        assert!(bet.guaranteed_profit < 0.0);
        assert_relative_eq!(bet.conversion_pct, bet.guaranteed_profit, epsilon = 1e-9);
    }

    #[test]
    fn equal_odds_without_commission_break_even() {
        let bet = matched_bet(10.0, 2.0, 2.0, 0.0).unwrap();
        assert_relative_eq!(bet.lay_stake, 10.0, epsilon = 1e-12);
        assert_relative_eq!(bet.guaranteed_profit, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bet.if_back_loses, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_stake_has_zero_conversion() {
        let bet = matched_bet(0.0, 2.0, 2.1, 0.02).unwrap();
        assert_eq!(bet.conversion_pct, 0.0);
        assert_eq!(bet.lay_stake, 0.0);
    }

    #[test]
    fn degenerate_lay_odds_rejected() {
        assert_eq!(
            matched_bet(10.0, 2.0, 0.02, 0.02),
            Err(OddsError::LayOddsBelowCommission {
                lay_odds: 0.02,
                commission: 0.02
            })
        );
        assert!(matches!(
            matched_bet(10.0, f64::INFINITY, 2.0, 0.02),
            Err(OddsError::NonFinite { name: "back odds", .. })
        ));
    }
}
