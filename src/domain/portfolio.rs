//! Holdings, capital and value history of a simulation run.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// Share counts by symbol. A negative count is a short position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    holdings: BTreeMap<String, i64>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holdings(&self, symbol: &str) -> i64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn adjust(&mut self, symbol: &str, delta: i64) {
        *self.holdings.entry(symbol.to_string()).or_insert(0) += delta;
    }

    /// Non-zero positions in symbol order.
    pub fn positions(&self) -> impl Iterator<Item = (&str, i64)> {
        self.holdings
            .iter()
            .filter(|(_, q)| **q != 0)
            .map(|(s, q)| (s.as_str(), *q))
    }

    /// Sum of holdings * price. Symbols missing from `prices` count as zero.
    pub fn market_value(&self, prices: &BTreeMap<String, Decimal>) -> Decimal {
        self.holdings
            .iter()
            .filter_map(|(symbol, &qty)| prices.get(symbol).map(|&p| p * Decimal::from(qty)))
            .sum()
    }
}

/// How cash is held during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum CapitalState {
    /// One balance shared by every symbol.
    Pooled(Decimal),
    /// An independent balance per symbol; never moves between symbols.
    PerSymbol(BTreeMap<String, Decimal>),
}

/// Which capital model a strategy trades under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapitalModel {
    Pooled,
    PerSymbol,
}

impl CapitalState {
    /// Split or pool `initial_capital` over `symbols` according to `model`.
    pub fn allocate<'a>(
        model: CapitalModel,
        initial_capital: Decimal,
        symbols: impl ExactSizeIterator<Item = &'a str>,
    ) -> Self {
        match model {
            CapitalModel::Pooled => CapitalState::Pooled(initial_capital),
            CapitalModel::PerSymbol => {
                let count = symbols.len();
                if count == 0 {
                    return CapitalState::PerSymbol(BTreeMap::new());
                }
                let slice = initial_capital / Decimal::from(count);
                CapitalState::PerSymbol(symbols.map(|s| (s.to_string(), slice)).collect())
            }
        }
    }

    /// Cash available to trade `symbol`.
    pub fn available(&self, symbol: &str) -> Decimal {
        match self {
            CapitalState::Pooled(cash) => *cash,
            CapitalState::PerSymbol(slices) => slices.get(symbol).copied().unwrap_or(Decimal::ZERO),
        }
    }

    /// Add `amount` (negative to spend) to the balance that funds `symbol`.
    pub fn credit(&mut self, symbol: &str, amount: Decimal) {
        match self {
            CapitalState::Pooled(cash) => *cash += amount,
            CapitalState::PerSymbol(slices) => {
                *slices.entry(symbol.to_string()).or_insert(Decimal::ZERO) += amount
            }
        }
    }

    pub fn total(&self) -> Decimal {
        match self {
            CapitalState::Pooled(cash) => *cash,
            CapitalState::PerSymbol(slices) => slices.values().copied().sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// One executed order.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub side: Side,
    pub quantity: i64,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Portfolio value per simulated day. Append-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSeries {
    points: Vec<ValuePoint>,
}

impl ValueSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, date: NaiveDate, value: Decimal) {
        self.points.push(ValuePoint { date, value });
    }

    pub fn points(&self) -> &[ValuePoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn last(&self) -> Option<&ValuePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
