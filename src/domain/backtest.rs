//! Backtest configuration and the load, simulate, analyze pipeline.

use crate::domain::benchmark::market_returns;
use crate::domain::error::StratbenchError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::simulator::{SimulationResult, Simulator};
use crate::domain::strategy::{StrategyKind, StrategyParams};
use crate::domain::universe::{SkippedSymbol, build_market_data};
use crate::ports::data_port::PriceProvider;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Consolidated price file. May come from the command line instead.
    pub data_path: Option<PathBuf>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` trades every symbol in the data source.
    pub symbols: Option<Vec<String>>,
    pub initial_capital: Decimal,
    pub strategy: StrategyKind,
    pub params: StrategyParams,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 11, 30).unwrap_or_default(),
            symbols: None,
            initial_capital: Decimal::from(1_000_000),
            strategy: StrategyKind::Crossover,
            params: StrategyParams::default(),
        }
    }
}

/// Output of one complete backtest.
#[derive(Debug, Clone)]
pub struct BacktestOutcome {
    pub simulation: SimulationResult,
    pub report: PerformanceReport,
    pub skipped: Vec<SkippedSymbol>,
}

/// Load the universe, simulate the configured strategy and analyze the run.
///
/// Symbols need more than `long_window` bars so at least one day is
/// simulated.
pub fn run_backtest(
    provider: &dyn PriceProvider,
    config: &BacktestConfig,
) -> Result<BacktestOutcome, StratbenchError> {
    let strategy = config.strategy.build(&config.params);
    let min_bars = strategy.warmup() + 1;

    let universe = build_market_data(
        provider,
        config.symbols.as_deref(),
        config.start_date,
        config.end_date,
        min_bars,
    )?;
    let data = universe.data;

    info!(
        strategy = strategy.name(),
        indicators = %strategy
            .indicators()
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        symbols = data.symbol_count(),
        days = data.trading_days(),
        "running backtest"
    );

    let simulation = Simulator::new(&data, strategy.as_ref(), config.initial_capital).run();
    let market = market_returns(&data);
    let report = PerformanceReport::compute(&simulation, &market);

    info!(
        final_capital = %report.final_capital,
        total_return = report.total_return,
        trades = report.trades,
        "backtest complete"
    );

    Ok(BacktestOutcome {
        simulation,
        report,
        skipped: universe.skipped,
    })
}
