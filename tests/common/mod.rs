#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use stratbench::domain::backtest::BacktestConfig;
use stratbench::domain::error::StratbenchError;
pub use stratbench::domain::price_bar::PriceBar;
use stratbench::domain::price_series::PriceSeries;
use stratbench::domain::strategy::{StrategyKind, StrategyParams};
use stratbench::ports::data_port::PriceProvider;

pub struct MockPriceProvider {
    pub data: BTreeMap<String, Vec<PriceBar>>,
    pub errors: BTreeMap<String, String>,
}

impl MockPriceProvider {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceProvider for MockPriceProvider {
    fn list_symbols(&self) -> Result<Vec<String>, StratbenchError> {
        Ok(self
            .data
            .keys()
            .chain(self.errors.keys())
            .cloned()
            .collect())
    }

    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, StratbenchError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StratbenchError::DataRead {
                path: "mock".into(),
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start && b.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        PriceSeries::new(symbol, bars)
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn make_bar(symbol: &str, day: usize, adj_close: Decimal) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        date: start_date() + chrono::Duration::days(day as i64),
        open: adj_close,
        high: adj_close + Decimal::ONE,
        low: adj_close - Decimal::ONE,
        close: adj_close,
        adj_close,
        volume: 1_000_000,
    }
}

/// One bar per calendar day from 2024-01-01 with the given adjusted closes.
pub fn bars_from_closes(symbol: &str, closes: &[Decimal]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(day, &c)| make_bar(symbol, day, c))
        .collect()
}

/// `days` bars with adjusted close `start + step * day`.
pub fn linear_bars(symbol: &str, days: usize, start: Decimal, step: Decimal) -> Vec<PriceBar> {
    let closes: Vec<Decimal> = (0..days)
        .map(|d| start + step * Decimal::from(d as i64))
        .collect();
    bars_from_closes(symbol, &closes)
}

pub fn sample_config(strategy: StrategyKind) -> BacktestConfig {
    BacktestConfig {
        data_path: None,
        start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2030, 12, 31).unwrap(),
        symbols: None,
        initial_capital: Decimal::from(1_000_000),
        strategy,
        params: StrategyParams::default(),
    }
}

/// Consolidated CSV text for the given bars, rows in input order.
pub fn to_csv(bars: &[PriceBar]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Adj Close,Volume,Ticker\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.adj_close, b.volume, b.symbol
        ));
    }
    out
}
