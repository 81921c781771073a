//! Trading strategies.
//!
//! A strategy turns indicator values into a [`Signal`] per symbol per day,
//! then sizes that signal into an [`Order`]. The simulator owns all state and
//! applies the orders; strategies only read.

pub mod crossover;
pub mod momentum;

use crate::domain::indicator::IndicatorType;
use crate::domain::portfolio::{CapitalModel, Side};
use crate::domain::price_series::PriceSeries;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;
use std::str::FromStr;

pub use crossover::CrossoverStrategy;
pub use momentum::MomentumRiskStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

/// How signal generation and execution interleave within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOrder {
    /// Each symbol is signalled and executed before the next symbol.
    PerSymbol,
    /// Every symbol is signalled first, then every order is executed.
    SignalsFirst,
}

/// A sized order. `quantity` is in shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub side: Side,
    pub quantity: i64,
}

/// What a strategy may look at when sizing one symbol on one day.
#[derive(Debug, Clone)]
pub struct SizingContext<'a> {
    pub series: &'a PriceSeries,
    pub day: usize,
    /// Adjusted close of the day; every order fills at this price.
    pub price: Decimal,
    pub volume: i64,
    /// Cash that funds this symbol under the strategy's capital model.
    pub cash: Decimal,
    pub holdings: i64,
    /// Last recorded portfolio value, or the initial capital before day one.
    pub portfolio_value: Decimal,
}

pub trait Strategy {
    fn name(&self) -> &str;

    fn capital_model(&self) -> CapitalModel;

    fn execution_order(&self) -> ExecutionOrder;

    /// First bar index the simulation may trade on.
    fn warmup(&self) -> usize;

    /// Indicators this strategy reads, for logging.
    fn indicators(&self) -> Vec<IndicatorType>;

    fn generate_signal(&self, series: &PriceSeries, day: usize) -> Signal;

    /// `None` means no trade.
    fn size_position(&self, signal: Signal, ctx: &SizingContext<'_>) -> Option<Order>;
}

/// Tunable parameters shared by both strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub short_window: usize,
    pub long_window: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub risk_per_trade: Decimal,
    pub atr_multiplier: Decimal,
    pub rsi_buy_floor: Decimal,
    pub rsi_sell_ceiling: Decimal,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            short_window: 10,
            long_window: 50,
            rsi_period: 14,
            atr_period: 14,
            risk_per_trade: Decimal::new(5, 3),
            atr_multiplier: Decimal::from(3),
            rsi_buy_floor: Decimal::from(30),
            rsi_sell_ceiling: Decimal::from(70),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Crossover,
    Momentum,
}

impl StrategyKind {
    pub fn build(self, params: &StrategyParams) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Crossover => Box::new(CrossoverStrategy::new(params)),
            StrategyKind::Momentum => Box::new(MomentumRiskStrategy::new(params)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Crossover => write!(f, "crossover"),
            StrategyKind::Momentum => write!(f, "momentum"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crossover" | "sma" => Ok(StrategyKind::Crossover),
            "momentum" | "ema" => Ok(StrategyKind::Momentum),
            other => Err(format!(
                "unknown strategy '{}', expected 'crossover' or 'momentum'",
                other
            )),
        }
    }
}

/// Whole shares in `amount`, rounded toward negative infinity and saturated
/// at the i64 bounds.
pub(crate) fn whole_shares(amount: Decimal) -> i64 {
    amount.floor().to_i64().unwrap_or(if amount.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// `floor(cash / price)`, or 0 when the price is zero.
pub(crate) fn affordable_shares(cash: Decimal, price: Decimal) -> i64 {
    match cash.checked_div(price) {
        Some(q) => whole_shares(q),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_params() {
        let p = StrategyParams::default();
        assert_eq!(p.short_window, 10);
        assert_eq!(p.long_window, 50);
        assert_eq!(p.rsi_period, 14);
        assert_eq!(p.atr_period, 14);
        assert_eq!(p.risk_per_trade, dec!(0.005));
        assert_eq!(p.atr_multiplier, dec!(3));
        assert_eq!(p.rsi_buy_floor, dec!(30));
        assert_eq!(p.rsi_sell_ceiling, dec!(70));
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("crossover".parse::<StrategyKind>(), Ok(StrategyKind::Crossover));
        assert_eq!(" Momentum ".parse::<StrategyKind>(), Ok(StrategyKind::Momentum));
        assert_eq!("sma".parse::<StrategyKind>(), Ok(StrategyKind::Crossover));
        assert!("pairs".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn kind_builds_matching_strategy() {
        let params = StrategyParams::default();
        let crossover = StrategyKind::Crossover.build(&params);
        assert_eq!(crossover.capital_model(), CapitalModel::PerSymbol);
        assert_eq!(crossover.execution_order(), ExecutionOrder::PerSymbol);

        let momentum = StrategyKind::Momentum.build(&params);
        assert_eq!(momentum.capital_model(), CapitalModel::Pooled);
        assert_eq!(momentum.execution_order(), ExecutionOrder::SignalsFirst);
        assert_eq!(momentum.warmup(), 50);
    }

    #[test]
    fn whole_shares_floors() {
        assert_eq!(whole_shares(dec!(12.99)), 12);
        assert_eq!(whole_shares(dec!(-0.5)), -1);
        assert_eq!(whole_shares(dec!(0)), 0);
    }

    #[test]
    fn affordable_shares_zero_price() {
        assert_eq!(affordable_shares(dec!(100), dec!(0)), 0);
        assert_eq!(affordable_shares(dec!(100), dec!(30)), 3);
    }
}
