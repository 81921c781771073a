//! Report output port trait.

use crate::domain::error::StratbenchError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::strategy::StrategyParams;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &mut self,
        report: &PerformanceReport,
        params: &StrategyParams,
    ) -> Result<(), StratbenchError>;
}
