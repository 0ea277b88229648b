//! CSV report writer for ranked analyses and portfolio plans.
//!
//! Values are rounded to two decimals here and nowhere else.

use crate::domain::analysis::{AnalysisRecord, AnalysisRun};
use crate::domain::error::TradescoreError;
use crate::domain::portfolio::{PlannedPosition, PortfolioPlan};
use crate::ports::report_port::ReportPort;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRow {
    pub rank: usize,
    pub code: String,
    pub as_of: String,
    pub price: f64,
    pub rsi: Option<f64>,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub return_pct: Option<f64>,
    pub score: u8,
    pub signal: String,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub trailing_stop: f64,
    pub shares: u64,
    pub invested: f64,
    pub potential_gain: f64,
    pub potential_loss: f64,
    pub risk_reward: f64,
    pub explanation: String,
}

impl AnalysisRow {
    pub fn from_record(rank: usize, record: &AnalysisRecord) -> Self {
        AnalysisRow {
            rank,
            code: record.code.clone(),
            as_of: record.as_of.format("%Y-%m-%d").to_string(),
            price: round2(record.price),
            rsi: record.indicators.rsi.value().map(round2),
            ma20: record.indicators.ma_short.value().map(round2),
            ma50: record.indicators.ma_long.value().map(round2),
            return_pct: record.return_pct.value().map(round2),
            score: record.score,
            signal: record.signal.to_string(),
            stop_loss: round2(record.levels.stop_loss),
            take_profit: round2(record.levels.take_profit),
            trailing_stop: round2(record.levels.trailing_stop),
            shares: record.position.shares,
            invested: round2(record.position.invested),
            potential_gain: round2(record.outcome.potential_gain),
            potential_loss: round2(record.outcome.potential_loss),
            risk_reward: round2(record.outcome.risk_reward),
            explanation: record.explanation(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRow {
    pub code: String,
    pub signal: String,
    pub score: u8,
    pub price: f64,
    pub budget: f64,
    pub shares: u64,
    pub invested: f64,
    pub idle: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub potential_gain: f64,
    pub potential_loss: f64,
    pub risk_reward: f64,
}

impl PlanRow {
    pub fn from_position(position: &PlannedPosition, budget: f64) -> Self {
        PlanRow {
            code: position.code.clone(),
            signal: position.signal.to_string(),
            score: position.score,
            price: round2(position.price),
            budget: round2(budget),
            shares: position.position.shares,
            invested: round2(position.position.invested),
            idle: round2(position.slot_idle(budget)),
            stop_loss: round2(position.levels.stop_loss),
            take_profit: round2(position.levels.take_profit),
            potential_gain: round2(position.outcome.potential_gain),
            potential_loss: round2(position.outcome.potential_loss),
            risk_reward: round2(position.outcome.risk_reward),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    fn write_rows<T: Serialize>(rows: impl IntoIterator<Item = T>, output_path: &str) -> Result<usize, TradescoreError> {
        let to_err = |e: csv::Error| TradescoreError::data(output_path, e.to_string());
        let mut writer = csv::Writer::from_path(Path::new(output_path)).map_err(to_err)?;
        let mut count = 0;
        for row in rows {
            writer.serialize(row).map_err(to_err)?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_analysis(&self, run: &AnalysisRun, output_path: &str) -> Result<(), TradescoreError> {
        let rows = run
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| AnalysisRow::from_record(i + 1, r));
        let count = Self::write_rows(rows, output_path)?;
        tracing::info!(path = output_path, rows = count, "analysis report written");
        Ok(())
    }

    fn write_plan(&self, plan: &PortfolioPlan, output_path: &str) -> Result<(), TradescoreError> {
        let rows = plan
            .positions
            .iter()
            .map(|p| PlanRow::from_position(p, plan.capital_per_position));
        let count = Self::write_rows(rows, output_path)?;
        tracing::info!(path = output_path, rows = count, "portfolio plan written");
        Ok(())
    }
}
