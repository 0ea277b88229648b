//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::analysis_cache::AnalysisCache;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::{round2, CsvReportAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{
    analyze_universe, AnalysisConfig, AnalysisRecord, AnalysisRun, RunSummary, DEFAULT_CAPITAL, DEFAULT_POSITION_SIZE_PCT,
};
use crate::domain::config_validation::{
    parse_signal_list, validate_all, validate_analysis_config, validate_odds_config, validate_portfolio_config,
};
use crate::domain::error::TradescoreError;
use crate::domain::indicator::MIN_OBSERVATIONS;
use crate::domain::odds::{
    find_value_bets, league_average_goals, matched_bet, BookmakerOdds, MatchModel, Outcome, TeamRecord,
    DEFAULT_COMMISSION, DEFAULT_HOME_ADVANTAGE, DEFAULT_MAX_GOALS, DEFAULT_VALUE_MARGIN, MAX_GOALS_LIMIT,
};
use crate::domain::portfolio::{allocate, PortfolioPlan, Strategy};
use crate::domain::risk::{RiskRules, DEFAULT_STOP_LOSS_PCT, DEFAULT_TAKE_PROFIT_PCT};
use crate::domain::signal::Signal;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_TOP: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "tradescore", about = "Technical signal scoring and position sizing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score every instrument in a data directory and rank them
    Analyze {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        capital: Option<f64>,
        /// Number of ranked rows to print
        #[arg(long)]
        top: Option<usize>,
        /// Keep only these signals (repeatable)
        #[arg(long = "signal")]
        signals: Vec<Signal>,
        #[arg(long, default_value_t = 0)]
        min_score: u8,
        /// Print the reasons behind each signal
        #[arg(long)]
        explain: bool,
        /// Write the full ranking as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Split capital evenly across the instruments a strategy selects
    Plan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        /// strong_buy, buy or watch
        #[arg(short, long)]
        strategy: Option<Strategy>,
        #[arg(long)]
        capital: Option<f64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Poisson outcome probabilities and value bets for one match
    MatchOdds {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Home record as played,goals_for,goals_against
        #[arg(long)]
        home: TeamRecord,
        /// Away record as played,goals_for,goals_against
        #[arg(long)]
        away: TeamRecord,
        /// League goals per game; derived from the two records when omitted
        #[arg(long)]
        league_average: Option<f64>,
        /// Bookmaker decimal odds as home,draw,away
        #[arg(long)]
        odds: Option<BookmakerOdds>,
    },
    /// Lay stake and guaranteed profit of a back/lay pair
    MatchedBet {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        stake: f64,
        #[arg(long)]
        back_odds: f64,
        #[arg(long)]
        lay_odds: f64,
        /// Exchange commission as a fraction, e.g. 0.02
        #[arg(long)]
        commission: Option<f64>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            config,
            data_dir,
            capital,
            top,
            signals,
            min_score,
            explain,
            output,
        } => run_analyze(
            config.as_deref(),
            data_dir.as_deref(),
            capital,
            top,
            AnalyzeFilter { signals, min_score },
            explain,
            output.as_deref(),
        ),
        Command::Plan {
            config,
            data_dir,
            strategy,
            capital,
            output,
        } => run_plan(
            config.as_deref(),
            data_dir.as_deref(),
            strategy,
            capital,
            output.as_deref(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::MatchOdds {
            config,
            home,
            away,
            league_average,
            odds,
        } => run_match_odds(config.as_deref(), home, away, league_average, odds),
        Command::MatchedBet {
            config,
            stake,
            back_odds,
            lay_odds,
            commission,
        } => run_matched_bet(config.as_deref(), stake, back_odds, lay_odds, commission),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

/// The file at `path`, or an empty config that yields every default.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, TradescoreError> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::default()),
    }
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> AnalysisConfig {
    AnalysisConfig {
        capital: config.get_double("analysis", "capital", DEFAULT_CAPITAL),
        rules: RiskRules {
            stop_loss_pct: config.get_double("analysis", "stop_loss_pct", DEFAULT_STOP_LOSS_PCT),
            take_profit_pct: config.get_double("analysis", "take_profit_pct", DEFAULT_TAKE_PROFIT_PCT),
        },
        position_size_pct: config.get_double("analysis", "position_size_pct", DEFAULT_POSITION_SIZE_PCT),
    }
}

/// `signals` or `min_score` select a custom filter; otherwise the named strategy
/// (strong buy only when unset).
pub fn build_strategy(config: &dyn ConfigPort) -> Result<Strategy, TradescoreError> {
    let signals = config.get_string("portfolio", "signals");
    let min_score = config.get_string("portfolio", "min_score");

    if signals.is_some() || min_score.is_some() {
        let signals = match signals {
            Some(list) => parse_signal_list(&list)
                .map_err(|e| TradescoreError::invalid("portfolio", "signals", e.to_string()))?,
            None => Vec::new(),
        };
        let min_score = config.get_int("portfolio", "min_score", 0).clamp(0, u8::MAX as i64) as u8;
        return Ok(Strategy::Custom { signals, min_score });
    }

    match config.get_string("portfolio", "strategy") {
        Some(name) => name
            .parse::<Strategy>()
            .map_err(|e| TradescoreError::invalid("portfolio", "strategy", e.to_string())),
        None => Ok(Strategy::StrongBuyOnly),
    }
}

/// `[portfolio] capital`, falling back to `[analysis] capital`.
pub fn portfolio_capital(config: &dyn ConfigPort) -> f64 {
    let analysis_capital = config.get_double("analysis", "capital", DEFAULT_CAPITAL);
    config.get_double("portfolio", "capital", analysis_capital)
}

pub fn build_match_model(config: &dyn ConfigPort) -> MatchModel {
    MatchModel {
        home_advantage: config.get_double("odds", "home_advantage", DEFAULT_HOME_ADVANTAGE),
        max_goals: config
            .get_int("odds", "max_goals", DEFAULT_MAX_GOALS as i64)
            .clamp(1, MAX_GOALS_LIMIT as i64) as u32,
    }
}

pub fn resolve_data_dir(override_dir: Option<&Path>, config: &dyn ConfigPort) -> Result<PathBuf, TradescoreError> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    config
        .get_string("analysis", "data_dir")
        .map(PathBuf::from)
        .ok_or_else(|| TradescoreError::ConfigMissing {
            section: "analysis".into(),
            key: "data_dir".into(),
        })
}

/// Load every instrument and analyze it, failing only when nothing is analyzable.
///
/// Long-lived callers pass a cache to reuse runs over unchanged data. One-shot
/// commands pass `None` and skip fingerprinting.
pub fn load_and_analyze(
    data_port: &dyn DataPort,
    config: &AnalysisConfig,
    cache: Option<&AnalysisCache>,
) -> Result<AnalysisRun, TradescoreError> {
    let universe = data_port.fetch_universe()?;
    tracing::info!(instruments = universe.len(), "loaded price histories");

    let run = match cache {
        Some(cache) => cache.get_or_analyze(&universe, config),
        None => analyze_universe(&universe, config),
    };
    for skip in &run.skipped {
        tracing::warn!(
            code = %skip.code,
            bars = skip.bars,
            minimum = MIN_OBSERVATIONS,
            "insufficient history, skipped"
        );
    }
    if run.records.is_empty() {
        return Err(TradescoreError::NoAnalyzableData {
            minimum: MIN_OBSERVATIONS,
            skipped: run.skipped.len(),
        });
    }
    tracing::info!(
        analyzed = run.records.len(),
        skipped = run.skipped.len(),
        "analysis complete"
    );
    Ok(run)
}

pub struct AnalyzeFilter {
    pub signals: Vec<Signal>,
    pub min_score: u8,
}

impl AnalyzeFilter {
    pub fn apply<'a>(&self, records: &'a [AnalysisRecord]) -> Vec<&'a AnalysisRecord> {
        Strategy::Custom {
            signals: self.signals.clone(),
            min_score: self.min_score,
        }
        .select(records)
    }
}

fn run_analyze(
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
    capital: Option<f64>,
    top: Option<usize>,
    filter: AnalyzeFilter,
    explain: bool,
    output: Option<&Path>,
) -> Result<(), TradescoreError> {
    let mut adapter = load_config(config_path)?;
    if let Some(capital) = capital {
        adapter.set("analysis", "capital", capital);
    }
    validate_analysis_config(&adapter)?;

    let analysis_config = build_analysis_config(&adapter);
    let data_dir = resolve_data_dir(data_dir, &adapter)?;
    let top = top.unwrap_or_else(|| adapter.get_int("analysis", "top", DEFAULT_TOP as i64).max(1) as usize);

    tracing::info!(data_dir = %data_dir.display(), capital = analysis_config.capital, "analyzing");
    let data_port = CsvAdapter::new(data_dir);
    let run = load_and_analyze(&data_port, &analysis_config, None)?;

    let selected = filter.apply(&run.records);
    print_ranking(&selected[..top.min(selected.len())], explain);
    print_summary(&run.summary());

    if let Some(path) = output {
        CsvReportAdapter.write_analysis(&run, &path.display().to_string())?;
    }
    Ok(())
}

fn run_plan(
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
    strategy: Option<Strategy>,
    capital: Option<f64>,
    output: Option<&Path>,
) -> Result<(), TradescoreError> {
    let mut adapter = load_config(config_path)?;
    if let Some(capital) = capital {
        adapter.set("portfolio", "capital", capital);
    }
    validate_analysis_config(&adapter)?;
    validate_portfolio_config(&adapter)?;

    let strategy = match strategy {
        Some(s) => s,
        None => build_strategy(&adapter)?,
    };
    let total_capital = portfolio_capital(&adapter);
    let analysis_config = build_analysis_config(&adapter);
    let data_port = CsvAdapter::new(resolve_data_dir(data_dir, &adapter)?);

    let run = load_and_analyze(&data_port, &analysis_config, None)?;
    let plan = allocate(&run.records, strategy, total_capital);
    if plan.is_empty() {
        tracing::warn!(strategy = %plan.strategy, "no instrument matches the strategy; capital stays idle");
    }
    print_plan(&plan);

    if let Some(path) = output {
        CsvReportAdapter.write_plan(&plan, &path.display().to_string())?;
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TradescoreError> {
    let adapter = load_config(Some(config_path))?;
    validate_all(&adapter)?;

    let analysis = build_analysis_config(&adapter);
    let strategy = build_strategy(&adapter)?;
    let model = build_match_model(&adapter);

    println!("[analysis]");
    println!("  capital:           {:.0}", analysis.capital);
    println!("  stop_loss_pct:     {}", analysis.rules.stop_loss_pct);
    println!("  take_profit_pct:   {}", analysis.rules.take_profit_pct);
    println!("  position_size_pct: {}", analysis.position_size_pct);
    match adapter.get_string("analysis", "data_dir") {
        Some(dir) => println!("  data_dir:          {}", dir),
        None => println!("  data_dir:          (not set, pass --data-dir)"),
    }
    println!("[portfolio]");
    println!("  strategy:          {}", strategy);
    println!("  capital:           {:.0}", portfolio_capital(&adapter));
    println!("[odds]");
    println!("  home_advantage:    {}", model.home_advantage);
    println!("  max_goals:         {}", model.max_goals);

    tracing::info!(path = %config_path.display(), "configuration is valid");
    Ok(())
}

fn run_match_odds(
    config_path: Option<&Path>,
    home: TeamRecord,
    away: TeamRecord,
    league_average: Option<f64>,
    odds: Option<BookmakerOdds>,
) -> Result<(), TradescoreError> {
    let adapter = load_config(config_path)?;
    validate_odds_config(&adapter)?;

    let model = build_match_model(&adapter);
    let margin = adapter.get_double("odds", "value_margin", DEFAULT_VALUE_MARGIN);
    let average = league_average.unwrap_or_else(|| league_average_goals(&[home, away]));

    let prediction = model.predict(&home, &away, average).ok_or_else(|| {
        TradescoreError::invalid("match", "team", "both teams need at least one game played")
    })?;

    println!("Expected goals:  home {:.2}  away {:.2}", prediction.lambda_home, prediction.lambda_away);
    println!("Likely score:    {}", prediction.scoreline());
    println!("{:<6} {:>8} {:>10}", "", "prob %", "fair odds");
    for outcome in Outcome::ALL {
        println!(
            "{:<6} {:>8.2} {:>10.2}",
            outcome.label(),
            prediction.probability(outcome) * 100.0,
            prediction.fair_odds(outcome)
        );
    }

    if let Some(odds) = odds {
        let bets = find_value_bets(&prediction, &odds, margin);
        if bets.is_empty() {
            println!("\nNo value bets at margin {margin}");
        } else {
            println!("\nValue bets (margin {margin}):");
            for bet in &bets {
                println!(
                    "  {:<5} bookmaker {:.2} vs fair {:.2}: value {:+.2}%, EV {:+.2}%",
                    bet.outcome.label(),
                    bet.bookmaker_odds,
                    bet.fair_odds,
                    bet.value_pct,
                    bet.expected_value_pct
                );
            }
        }
    }
    Ok(())
}

fn run_matched_bet(
    config_path: Option<&Path>,
    stake: f64,
    back_odds: f64,
    lay_odds: f64,
    commission: Option<f64>,
) -> Result<(), TradescoreError> {
    let mut adapter = load_config(config_path)?;
    if let Some(commission) = commission {
        adapter.set("odds", "commission", commission);
    }
    validate_odds_config(&adapter)?;
    let commission = adapter.get_double("odds", "commission", DEFAULT_COMMISSION);

    let bet = matched_bet(stake, back_odds, lay_odds, commission)?;
    println!("Lay stake:         {:.2}", bet.lay_stake);
    println!("Liability:         {:.2}", bet.liability);
    println!("If back wins:      {:+.2}", bet.if_back_wins);
    println!("If back loses:     {:+.2}", bet.if_back_loses);
    println!("Guaranteed profit: {:+.2}", bet.guaranteed_profit);
    println!("Conversion:        {:.2}%", bet.conversion_pct);
    println!("Commission:        {:.2}%", commission * 100.0);
    Ok(())
}

fn print_ranking(records: &[&AnalysisRecord], explain: bool) {
    println!(
        "{:>4}  {:<8} {:>12} {:>7} {:>12} {:>12} {:>8} {:>5}  {:<10}",
        "rank", "code", "price", "rsi", "ma20", "ma50", "ret %", "score", "signal"
    );
    for (i, r) in records.iter().enumerate() {
        println!(
            "{:>4}  {:<8} {:>12.2} {:>7} {:>12} {:>12} {:>8} {:>5}  {:<10}",
            i + 1,
            r.code,
            r.price,
            r.indicators.rsi.to_string(),
            r.indicators.ma_short.to_string(),
            r.indicators.ma_long.to_string(),
            r.return_pct.to_string(),
            r.score,
            r.signal.label()
        );
        if explain {
            for reason in r.reasons() {
                println!("        - {}", reason);
            }
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== Summary ===");
    println!("Analyzed:     {}", summary.analyzed);
    println!(
        "Signals:      {} strong buy, {} buy, {} watch, {} wait",
        summary.strong_buy, summary.buy, summary.watch, summary.wait
    );
    if let Some(mean) = summary.mean_price {
        println!("Mean price:   {:.2}", mean);
    }
    if let Some(mean) = summary.mean_rsi {
        println!("Mean RSI:     {:.2}", mean);
    }
    if let Some(mean) = summary.mean_score {
        println!("Mean score:   {:.2}", mean);
    }
    if let (Some(code), Some(score)) = (&summary.best_code, summary.max_score) {
        println!("Best:         {} ({}/10)", code, score);
    }
}

fn print_plan(plan: &PortfolioPlan) {
    println!("Strategy:          {}", plan.strategy);
    println!("Total capital:     {:.0}", plan.total_capital);
    println!("Positions:         {}", plan.position_count());
    if !plan.is_empty() {
        println!("Per position:      {:.0}", plan.capital_per_position);
        println!(
            "\n{:<8} {:>12} {:>8} {:>14} {:>12} {:>12} {:>6}",
            "code", "price", "shares", "invested", "stop", "take", "score"
        );
        for p in &plan.positions {
            println!(
                "{:<8} {:>12.2} {:>8} {:>14.0} {:>12.2} {:>12.2} {:>6}",
                p.code, p.price, p.position.shares, p.position.invested, p.levels.stop_loss, p.levels.take_profit, p.score
            );
        }
    }
    println!("\nInvested:          {:.0}", plan.total_invested);
    println!("Idle cash:         {:.0}", plan.idle_cash);
    println!("Potential gain:    {:+.0}", plan.total_potential_gain);
    println!("Potential loss:    {:.0}", plan.total_potential_loss);
    println!("Risk/reward:       {:.2}", round2(plan.risk_reward));
}
