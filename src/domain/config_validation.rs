//! Configuration validation.
//!
//! Absent keys fall back to the built-in defaults, which always validate.

use crate::domain::analysis::{DEFAULT_CAPITAL, DEFAULT_POSITION_SIZE_PCT};
use crate::domain::error::TradescoreError;
use crate::domain::odds::{DEFAULT_COMMISSION, DEFAULT_MAX_GOALS, DEFAULT_VALUE_MARGIN, MAX_GOALS_LIMIT};
use crate::domain::portfolio::Strategy;
use crate::domain::risk::{DEFAULT_STOP_LOSS_PCT, DEFAULT_TAKE_PROFIT_PCT};
use crate::domain::scoring::MAX_SCORE;
use crate::domain::signal::Signal;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    validate_capital(config, "analysis")?;
    validate_stop_loss(config)?;
    validate_take_profit(config)?;
    validate_position_size(config)?;
    validate_top(config)?;
    Ok(())
}

pub fn validate_portfolio_config(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    if config.get_string("portfolio", "capital").is_some() {
        validate_capital(config, "portfolio")?;
    }
    validate_strategy(config)?;
    validate_min_score(config)?;
    validate_signals(config)?;
    Ok(())
}

pub fn validate_odds_config(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    validate_max_goals(config)?;
    validate_value_margin(config)?;
    validate_commission(config)?;
    Ok(())
}

/// Every section, in file order.
pub fn validate_all(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    validate_analysis_config(config)?;
    validate_portfolio_config(config)?;
    validate_odds_config(config)?;
    Ok(())
}

fn validate_capital(config: &dyn ConfigPort, section: &str) -> Result<(), TradescoreError> {
    let value = config.get_double(section, "capital", DEFAULT_CAPITAL);
    if !(value.is_finite() && value > 0.0) {
        return Err(TradescoreError::invalid(
            section,
            "capital",
            "capital must be positive",
        ));
    }
    Ok(())
}

fn validate_stop_loss(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    let value = config.get_double("analysis", "stop_loss_pct", DEFAULT_STOP_LOSS_PCT);
    if !(value < 0.0 && value > -100.0) {
        return Err(TradescoreError::invalid(
            "analysis",
            "stop_loss_pct",
            "stop_loss_pct must be between -100 and 0 (exclusive)",
        ));
    }
    Ok(())
}

fn validate_take_profit(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    let value = config.get_double("analysis", "take_profit_pct", DEFAULT_TAKE_PROFIT_PCT);
    if !(value.is_finite() && value > 0.0) {
        return Err(TradescoreError::invalid(
            "analysis",
            "take_profit_pct",
            "take_profit_pct must be positive",
        ));
    }
    Ok(())
}

fn validate_position_size(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    let value = config.get_double("analysis", "position_size_pct", DEFAULT_POSITION_SIZE_PCT);
    if !(value > 0.0 && value <= 100.0) {
        return Err(TradescoreError::invalid(
            "analysis",
            "position_size_pct",
            "position_size_pct must be in (0, 100]",
        ));
    }
    Ok(())
}

fn validate_top(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    if config.get_int("analysis", "top", 1) < 1 {
        return Err(TradescoreError::invalid(
            "analysis",
            "top",
            "top must be at least 1",
        ));
    }
    Ok(())
}

fn validate_strategy(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    if let Some(name) = config.get_string("portfolio", "strategy") {
        name.parse::<Strategy>()
            .map_err(|e| TradescoreError::invalid("portfolio", "strategy", e.to_string()))?;
    }
    Ok(())
}

fn validate_min_score(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    let value = config.get_int("portfolio", "min_score", 0);
    if !(0..=MAX_SCORE as i64).contains(&value) {
        return Err(TradescoreError::invalid(
            "portfolio",
            "min_score",
            format!("min_score must be between 0 and {}", MAX_SCORE),
        ));
    }
    Ok(())
}

fn validate_signals(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    if let Some(list) = config.get_string("portfolio", "signals") {
        parse_signal_list(&list)
            .map_err(|e| TradescoreError::invalid("portfolio", "signals", e.to_string()))?;
    }
    Ok(())
}

/// Comma-separated signal names, blanks ignored.
pub fn parse_signal_list(list: &str) -> Result<Vec<Signal>, crate::domain::signal::UnknownSignal> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

fn validate_max_goals(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    let value = config.get_int("odds", "max_goals", DEFAULT_MAX_GOALS as i64);
    if !(1..=MAX_GOALS_LIMIT as i64).contains(&value) {
        return Err(TradescoreError::invalid(
            "odds",
            "max_goals",
            format!("max_goals must be between 1 and {MAX_GOALS_LIMIT}"),
        ));
    }
    Ok(())
}

fn validate_value_margin(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    let value = config.get_double("odds", "value_margin", DEFAULT_VALUE_MARGIN);
    if !(value.is_finite() && value >= 1.0) {
        return Err(TradescoreError::invalid(
            "odds",
            "value_margin",
            "value_margin must be at least 1",
        ));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    let value = config.get_double("odds", "commission", DEFAULT_COMMISSION);
    if !(0.0..1.0).contains(&value) {
        return Err(TradescoreError::invalid(
            "odds",
            "commission",
            "commission must be between 0 and 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: TradescoreError) -> String {
        match err {
            TradescoreError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn full_config_passes() {
        let config = make_config(
            r#"
[analysis]
capital = 1000000
stop_loss_pct = -5
take_profit_pct = 10
position_size_pct = 10
data_dir = ./data
top = 10

[portfolio]
strategy = strong_buy
capital = 20000000
min_score = 5
signals = strong buy, buy

[odds]
home_advantage = 1.10
max_goals = 10
value_margin = 1.05
commission = 0.02
"#,
        );
        assert!(validate_all(&config).is_ok());
    }

    #[test]
    fn empty_config_uses_valid_defaults() {
        let config = make_config("");
        assert!(validate_all(&config).is_ok());
    }

    #[test]
    fn capital_must_be_positive() {
        let err = validate_analysis_config(&make_config("[analysis]\ncapital = 0\n")).unwrap_err();
        assert_eq!(invalid_key(err), "capital");

        let err = validate_portfolio_config(&make_config("[portfolio]\ncapital = -10\n")).unwrap_err();
        assert!(matches!(err, TradescoreError::ConfigInvalid { section, .. } if section == "portfolio"));
    }

    #[test]
    fn stop_loss_must_be_negative() {
        let err = validate_analysis_config(&make_config("[analysis]\nstop_loss_pct = 5\n")).unwrap_err();
        assert_eq!(invalid_key(err), "stop_loss_pct");

        let err = validate_analysis_config(&make_config("[analysis]\nstop_loss_pct = 0\n")).unwrap_err();
        assert_eq!(invalid_key(err), "stop_loss_pct");
    }

    #[test]
    fn take_profit_must_be_positive() {
        let err = validate_analysis_config(&make_config("[analysis]\ntake_profit_pct = -1\n")).unwrap_err();
        assert_eq!(invalid_key(err), "take_profit_pct");
    }

    #[test]
    fn position_size_bounds() {
        let err = validate_analysis_config(&make_config("[analysis]\nposition_size_pct = 0\n")).unwrap_err();
        assert_eq!(invalid_key(err), "position_size_pct");

        let err = validate_analysis_config(&make_config("[analysis]\nposition_size_pct = 150\n")).unwrap_err();
        assert_eq!(invalid_key(err), "position_size_pct");

        assert!(validate_analysis_config(&make_config("[analysis]\nposition_size_pct = 100\n")).is_ok());
    }

    #[test]
    fn unknown_strategy_fails() {
        let err = validate_portfolio_config(&make_config("[portfolio]\nstrategy = yolo\n")).unwrap_err();
        assert_eq!(invalid_key(err), "strategy");
    }

    #[test]
    fn min_score_out_of_range_fails() {
        let err = validate_portfolio_config(&make_config("[portfolio]\nmin_score = 11\n")).unwrap_err();
        assert_eq!(invalid_key(err), "min_score");
    }

    #[test]
    fn unknown_signal_in_list_fails() {
        let err = validate_portfolio_config(&make_config("[portfolio]\nsignals = buy, sell\n")).unwrap_err();
        assert_eq!(invalid_key(err), "signals");
    }

    #[test]
    fn signal_list_parsing() {
        assert_eq!(
            parse_signal_list("strong_buy, buy,,").unwrap(),
            vec![Signal::StrongBuy, Signal::Buy]
        );
        assert!(parse_signal_list("").unwrap().is_empty());
    }

    #[test]
    fn odds_bounds() {
        let err = validate_odds_config(&make_config("[odds]\nmax_goals = 0\n")).unwrap_err();
        assert_eq!(invalid_key(err), "max_goals");

        let err = validate_odds_config(&make_config("[odds]\nmax_goals = 101\n")).unwrap_err();
        assert_eq!(invalid_key(err), "max_goals");
        assert!(validate_odds_config(&make_config("[odds]\nmax_goals = 100\n")).is_ok());

        let err = validate_odds_config(&make_config("[odds]\nvalue_margin = 0.9\n")).unwrap_err();
        assert_eq!(invalid_key(err), "value_margin");

        let err = validate_odds_config(&make_config("[odds]\ncommission = 1\n")).unwrap_err();
        assert_eq!(invalid_key(err), "commission");

        assert!(validate_odds_config(&make_config("[odds]\ncommission = 0\n")).is_ok());
    }
}
