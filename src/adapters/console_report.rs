//! Plain-text backtest report.

use crate::domain::error::StratbenchError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::strategy::StrategyParams;
use crate::ports::report_port::ReportPort;
use std::io::Write;

/// Writes the fixed-format report, every number with six decimals.
pub struct ConsoleReportAdapter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReportAdapter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleReportAdapter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ReportPort for ConsoleReportAdapter<W> {
    fn write(
        &mut self,
        report: &PerformanceReport,
        params: &StrategyParams,
    ) -> Result<(), StratbenchError> {
        let out = &mut self.out;
        writeln!(
            out,
            "Backtest Results using shortWindow = {} and longWindow = {}",
            params.short_window, params.long_window
        )?;
        writeln!(out, "Initial Capital: ${:.6}", report.initial_capital)?;
        writeln!(out, "Final Capital: ${:.6}", report.final_capital)?;
        writeln!(
            out,
            "Linear Regression coefficients: {:.6}, {:.6}",
            report.alpha, report.beta
        )?;
        writeln!(out, "Accuracy of trading signal: {:.6}", report.accuracy)?;
        writeln!(out, "Maximum Drawdown : {:.6}", report.max_drawdown)?;
        writeln!(out, "Annualized Sharpe Ratio: {:.6}", report.annualized_sharpe)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
