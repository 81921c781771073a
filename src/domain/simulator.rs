//! Day-by-day portfolio simulation.
//!
//! The simulator owns cash, holdings, the value history and the trade log.
//! Each call to [`Simulator::advance_day`] processes one trading day: read the
//! day's adjusted closes, let the strategy signal and size per its execution
//! order, apply the orders, then record cash plus marked-to-market holdings.
//!
//! Every series in the [`MarketData`] must share the first series' trading
//! calendar. This is not checked here; indexing past the end of a shorter
//! series panics.

use crate::domain::market_data::MarketData;
use crate::domain::portfolio::{CapitalState, Portfolio, Side, TradeRecord, ValueSeries};
use crate::domain::price_series::PriceSeries;
use crate::domain::strategy::{ExecutionOrder, Signal, SizingContext, Strategy};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Final state of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub strategy: String,
    pub initial_capital: Decimal,
    /// First simulated bar index; also the benchmark alignment offset.
    pub start_day: usize,
    pub cash: CapitalState,
    pub portfolio: Portfolio,
    pub values: ValueSeries,
    pub trades: Vec<TradeRecord>,
}

impl SimulationResult {
    /// Last recorded portfolio value, or the initial capital when no day was
    /// simulated.
    pub fn final_capital(&self) -> Decimal {
        self.values
            .last()
            .map(|p| p.value)
            .unwrap_or(self.initial_capital)
    }
}

pub struct Simulator<'a> {
    data: &'a MarketData,
    strategy: &'a dyn Strategy,
    initial_capital: Decimal,
    capital: CapitalState,
    portfolio: Portfolio,
    values: ValueSeries,
    trades: Vec<TradeRecord>,
    last_value: Decimal,
    next_day: usize,
}

impl<'a> Simulator<'a> {
    pub fn new(data: &'a MarketData, strategy: &'a dyn Strategy, initial_capital: Decimal) -> Self {
        let capital =
            CapitalState::allocate(strategy.capital_model(), initial_capital, data.symbols());
        Self {
            data,
            strategy,
            initial_capital,
            capital,
            portfolio: Portfolio::new(),
            values: ValueSeries::new(),
            trades: Vec::new(),
            last_value: initial_capital,
            next_day: strategy.warmup(),
        }
    }

    pub fn capital(&self) -> &CapitalState {
        &self.capital
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn values(&self) -> &ValueSeries {
        &self.values
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    /// Bar index the next call to `advance_day` will process.
    pub fn next_day(&self) -> usize {
        self.next_day
    }

    pub fn is_finished(&self) -> bool {
        self.next_day >= self.data.trading_days()
    }

    /// Simulate the next trading day and return the portfolio value recorded
    /// for it, or `None` once the last bar has been processed.
    pub fn advance_day(&mut self) -> Option<Decimal> {
        if self.is_finished() {
            return None;
        }
        let day = self.next_day;
        let data = self.data;
        let series = data.series();

        match self.strategy.execution_order() {
            ExecutionOrder::PerSymbol => {
                for s in series {
                    let signal = self.strategy.generate_signal(s, day);
                    self.execute(s, day, signal);
                }
            }
            ExecutionOrder::SignalsFirst => {
                let signals: Vec<Signal> = series
                    .iter()
                    .map(|s| self.strategy.generate_signal(s, day))
                    .collect();
                for (s, signal) in series.iter().zip(signals) {
                    self.execute(s, day, signal);
                }
            }
        }

        let closes: BTreeMap<String, Decimal> = series
            .iter()
            .map(|s| (s.symbol().to_string(), s.adj_close(day)))
            .collect();
        let value = self.capital.total() + self.portfolio.market_value(&closes);

        // series are aligned, so the first one carries the day's date
        let date = series[0].bars()[day].date;
        self.values.record(date, value);
        self.last_value = value;
        self.next_day += 1;

        debug!(day, %date, %value, "recorded portfolio value");
        Some(value)
    }

    fn execute(&mut self, series: &PriceSeries, day: usize, signal: Signal) {
        if signal == Signal::Hold {
            return;
        }
        let symbol = series.symbol();
        let bar = &series.bars()[day];

        let ctx = SizingContext {
            series,
            day,
            price: bar.adj_close,
            volume: bar.volume,
            cash: self.capital.available(symbol),
            holdings: self.portfolio.holdings(symbol),
            portfolio_value: self.last_value,
        };
        let Some(order) = self.strategy.size_position(signal, &ctx) else {
            return;
        };

        let notional = ctx.price * Decimal::from(order.quantity);
        match order.side {
            Side::Buy => {
                self.capital.credit(symbol, -notional);
                self.portfolio.adjust(symbol, order.quantity);
            }
            Side::Sell => {
                self.capital.credit(symbol, notional);
                self.portfolio.adjust(symbol, -order.quantity);
            }
        }

        debug!(
            date = %bar.date,
            symbol,
            side = %order.side,
            quantity = order.quantity,
            price = %ctx.price,
            "executed order"
        );
        self.trades.push(TradeRecord {
            date: bar.date,
            symbol: symbol.to_string(),
            side: order.side,
            quantity: order.quantity,
            price: ctx.price,
        });
    }

    /// Simulate every remaining day.
    pub fn run(mut self) -> SimulationResult {
        info!(
            strategy = self.strategy.name(),
            symbols = self.data.symbol_count(),
            first_day = self.next_day,
            days = self.data.trading_days().saturating_sub(self.next_day),
            "starting simulation"
        );
        while self.advance_day().is_some() {}
        self.finish()
    }

    pub fn finish(self) -> SimulationResult {
        info!(
            days = self.values.len(),
            trades = self.trades.len(),
            final_value = %self.last_value,
            "simulation finished"
        );
        SimulationResult {
            strategy: self.strategy.name().to_string(),
            initial_capital: self.initial_capital,
            start_day: self.strategy.warmup(),
            cash: self.capital,
            portfolio: self.portfolio,
            values: self.values,
            trades: self.trades,
        }
    }
}
