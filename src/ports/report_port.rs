//! Report output port trait.

use crate::domain::analysis::AnalysisRun;
use crate::domain::error::TradescoreError;
use crate::domain::portfolio::PortfolioPlan;

pub trait ReportPort {
    fn write_analysis(&self, run: &AnalysisRun, output_path: &str) -> Result<(), TradescoreError>;

    fn write_plan(&self, plan: &PortfolioPlan, output_path: &str) -> Result<(), TradescoreError>;
}
