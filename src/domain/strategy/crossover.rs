//! Short/long SMA crossover with an isolated capital slice per symbol.

use crate::domain::indicator::IndicatorType;
use crate::domain::portfolio::{CapitalModel, Side};
use crate::domain::price_series::PriceSeries;
use crate::domain::strategy::{
    ExecutionOrder, Order, Signal, SizingContext, Strategy, StrategyParams, affordable_shares,
};

/// Buys while the short SMA is above the long SMA and sells while it is
/// below. Order size is capped by the day's traded volume; sells are also
/// capped by holdings, so this strategy never goes short.
#[derive(Debug, Clone)]
pub struct CrossoverStrategy {
    short: IndicatorType,
    long: IndicatorType,
    long_window: usize,
}

impl CrossoverStrategy {
    pub fn new(params: &StrategyParams) -> Self {
        Self {
            short: IndicatorType::Sma(params.short_window),
            long: IndicatorType::Sma(params.long_window),
            long_window: params.long_window,
        }
    }
}

impl Strategy for CrossoverStrategy {
    fn name(&self) -> &str {
        "SMA crossover"
    }

    fn capital_model(&self) -> CapitalModel {
        CapitalModel::PerSymbol
    }

    fn execution_order(&self) -> ExecutionOrder {
        ExecutionOrder::PerSymbol
    }

    fn warmup(&self) -> usize {
        self.long_window
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![self.short, self.long]
    }

    fn generate_signal(&self, series: &PriceSeries, day: usize) -> Signal {
        let bars = series.bars();
        let (Some(short), Some(long)) = (self.short.compute(bars, day), self.long.compute(bars, day))
        else {
            return Signal::Hold;
        };

        if short > long {
            Signal::Buy
        } else if short < long {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn size_position(&self, signal: Signal, ctx: &SizingContext<'_>) -> Option<Order> {
        let (side, quantity) = match signal {
            Signal::Buy => (Side::Buy, affordable_shares(ctx.cash, ctx.price).min(ctx.volume)),
            Signal::Sell => (Side::Sell, ctx.holdings.min(ctx.volume)),
            Signal::Hold => return None,
        };
        (quantity > 0).then_some(Order { side, quantity })
    }
}
