//! EMA trend filter with RSI gating and ATR risk-based sizing on pooled cash.

use crate::domain::indicator::IndicatorType;
use crate::domain::portfolio::{CapitalModel, Side};
use crate::domain::price_series::PriceSeries;
use crate::domain::strategy::{
    ExecutionOrder, Order, Signal, SizingContext, Strategy, StrategyParams, affordable_shares,
    whole_shares,
};
use rust_decimal::Decimal;
use tracing::warn;

/// Buy when the short EMA is above the long EMA and RSI is above the buy
/// floor. Sell when the short EMA is below the long EMA and RSI is below the
/// sell ceiling.
///
/// Every order risks `risk_per_trade` of the last portfolio value against a
/// stop of `atr_multiplier * ATR`. Sells trade the full risk-sized quantity
/// whatever the current holdings, so a position can go short without limit.
#[derive(Debug, Clone)]
pub struct MomentumRiskStrategy {
    short: IndicatorType,
    long: IndicatorType,
    rsi: IndicatorType,
    atr: IndicatorType,
    long_window: usize,
    risk_per_trade: Decimal,
    atr_multiplier: Decimal,
    rsi_buy_floor: Decimal,
    rsi_sell_ceiling: Decimal,
}

impl MomentumRiskStrategy {
    pub fn new(params: &StrategyParams) -> Self {
        Self {
            short: IndicatorType::Ema(params.short_window),
            long: IndicatorType::Ema(params.long_window),
            rsi: IndicatorType::Rsi(params.rsi_period),
            atr: IndicatorType::Atr(params.atr_period),
            long_window: params.long_window,
            risk_per_trade: params.risk_per_trade,
            atr_multiplier: params.atr_multiplier,
            rsi_buy_floor: params.rsi_buy_floor,
            rsi_sell_ceiling: params.rsi_sell_ceiling,
        }
    }

    /// `floor(portfolio_value * risk / (ATR * multiplier) / price)`.
    ///
    /// Returns 0 when the stop distance or the price is zero, or when ATR is
    /// not defined at this day.
    pub fn max_shares_by_risk(&self, ctx: &SizingContext<'_>) -> i64 {
        let Some(atr) = self.atr.compute(ctx.series.bars(), ctx.day) else {
            return 0;
        };
        let risk_amount = ctx.portfolio_value * self.risk_per_trade;
        let stop_distance = atr * self.atr_multiplier;

        match risk_amount
            .checked_div(stop_distance)
            .and_then(|per_unit| per_unit.checked_div(ctx.price))
        {
            Some(shares) => whole_shares(shares),
            None => {
                warn!(
                    symbol = ctx.series.symbol(),
                    day = ctx.day,
                    %stop_distance,
                    price = %ctx.price,
                    "zero stop distance or price, sizing to 0 shares"
                );
                0
            }
        }
    }
}

impl Strategy for MomentumRiskStrategy {
    fn name(&self) -> &str {
        "EMA momentum with ATR risk sizing"
    }

    fn capital_model(&self) -> CapitalModel {
        CapitalModel::Pooled
    }

    fn execution_order(&self) -> ExecutionOrder {
        ExecutionOrder::SignalsFirst
    }

    fn warmup(&self) -> usize {
        self.long_window
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![self.short, self.long, self.rsi, self.atr]
    }

    fn generate_signal(&self, series: &PriceSeries, day: usize) -> Signal {
        let bars = series.bars();
        let (Some(short), Some(long), Some(rsi)) = (
            self.short.compute(bars, day),
            self.long.compute(bars, day),
            self.rsi.compute(bars, day),
        ) else {
            return Signal::Hold;
        };

        if short > long && rsi > self.rsi_buy_floor {
            Signal::Buy
        } else if short < long && rsi < self.rsi_sell_ceiling {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn size_position(&self, signal: Signal, ctx: &SizingContext<'_>) -> Option<Order> {
        if signal == Signal::Hold {
            return None;
        }
        let max_shares = self.max_shares_by_risk(ctx);

        match signal {
            Signal::Buy => {
                let quantity = max_shares.min(affordable_shares(ctx.cash, ctx.price));
                (quantity > 0).then_some(Order {
                    side: Side::Buy,
                    quantity,
                })
            }
            Signal::Sell => (max_shares != 0).then_some(Order {
                side: Side::Sell,
                quantity: max_shares,
            }),
            Signal::Hold => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_bar::PriceBar;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn params() -> StrategyParams {
        StrategyParams {
            short_window: 2,
            long_window: 4,
            rsi_period: 3,
            atr_period: 2,
            ..StrategyParams::default()
        }
    }

    fn make_series(closes: &[Decimal]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                symbol: "NVDA".into(),
                date: start + chrono::Duration::days(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                adj_close: c,
                volume: 1000,
            })
            .collect();
        PriceSeries::new("NVDA", bars).unwrap()
    }

    fn ctx<'a>(series: &'a PriceSeries, day: usize, cash: Decimal, holdings: i64) -> SizingContext<'a> {
        SizingContext {
            series,
            day,
            price: series.adj_close(day),
            volume: 1000,
            cash,
            holdings,
            portfolio_value: dec!(1000000),
        }
    }

    #[test]
    fn uptrend_signals_buy() {
        let series = make_series(&[dec!(10), dec!(11), dec!(12), dec!(13), dec!(14), dec!(15)]);
        let strategy = MomentumRiskStrategy::new(&params());
        assert_eq!(strategy.generate_signal(&series, 5), Signal::Buy);
    }

    #[test]
    fn downtrend_signals_sell() {
        let series = make_series(&[dec!(15), dec!(14), dec!(13), dec!(12), dec!(11), dec!(10)]);
        let strategy = MomentumRiskStrategy::new(&params());
        // RSI is 0, below the sell ceiling
        assert_eq!(strategy.generate_signal(&series, 5), Signal::Sell);
    }

    #[test]
    fn uptrend_with_weak_rsi_holds() {
        let series = make_series(&[dec!(10), dec!(11), dec!(12), dec!(13), dec!(14), dec!(15)]);
        let strategy = MomentumRiskStrategy::new(&StrategyParams {
            rsi_buy_floor: dec!(100),
            ..params()
        });
        // RSI is exactly 100, not above the floor
        assert_eq!(strategy.generate_signal(&series, 5), Signal::Hold);
    }

    #[test]
    fn downtrend_with_high_rsi_ceiling_reached_holds() {
        let series = make_series(&[dec!(15), dec!(14), dec!(13), dec!(12), dec!(11), dec!(10)]);
        let strategy = MomentumRiskStrategy::new(&StrategyParams {
            rsi_sell_ceiling: dec!(0),
            ..params()
        });
        assert_eq!(strategy.generate_signal(&series, 5), Signal::Hold);
    }

    #[test]
    fn warmup_holds() {
        let series = make_series(&[dec!(10), dec!(11), dec!(12)]);
        let strategy = MomentumRiskStrategy::new(&params());
        assert_eq!(strategy.generate_signal(&series, 2), Signal::Hold);
    }

    #[test]
    fn risk_sizing() {
        // ATR(2) at day 5 = 1, stop = 3, risk = 5000 -> 5000 / 3 / 15 = 111.1
        let series = make_series(&[dec!(10), dec!(11), dec!(12), dec!(13), dec!(14), dec!(15)]);
        let strategy = MomentumRiskStrategy::new(&params());
        assert_eq!(strategy.max_shares_by_risk(&ctx(&series, 5, dec!(0), 0)), 111);
    }

    #[test]
    fn buy_limited_by_risk() {
        let series = make_series(&[dec!(10), dec!(11), dec!(12), dec!(13), dec!(14), dec!(15)]);
        let strategy = MomentumRiskStrategy::new(&params());
        let order = strategy.size_position(Signal::Buy, &ctx(&series, 5, dec!(1000000), 0));
        assert_eq!(order, Some(Order { side: Side::Buy, quantity: 111 }));
    }

    #[test]
    fn buy_limited_by_cash() {
        let series = make_series(&[dec!(10), dec!(11), dec!(12), dec!(13), dec!(14), dec!(15)]);
        let strategy = MomentumRiskStrategy::new(&params());
        let order = strategy.size_position(Signal::Buy, &ctx(&series, 5, dec!(100), 0));
        assert_eq!(order, Some(Order { side: Side::Buy, quantity: 6 }));
    }

    #[test]
    fn buy_skipped_when_nothing_affordable() {
        let series = make_series(&[dec!(10), dec!(11), dec!(12), dec!(13), dec!(14), dec!(15)]);
        let strategy = MomentumRiskStrategy::new(&params());
        assert_eq!(strategy.size_position(Signal::Buy, &ctx(&series, 5, dec!(14), 0)), None);
    }

    #[test]
    fn sell_ignores_holdings() {
        let series = make_series(&[dec!(15), dec!(14), dec!(13), dec!(12), dec!(11), dec!(10)]);
        let strategy = MomentumRiskStrategy::new(&params());
        // risk 5000 / stop 3 / price 10 = 166.6
        let order = strategy.size_position(Signal::Sell, &ctx(&series, 5, dec!(0), 0));
        assert_eq!(order, Some(Order { side: Side::Sell, quantity: 166 }));
    }

    #[test]
    fn flat_prices_size_to_zero() {
        let series = make_series(&[dec!(10); 6]);
        let strategy = MomentumRiskStrategy::new(&params());
        assert_eq!(strategy.max_shares_by_risk(&ctx(&series, 5, dec!(1000), 0)), 0);
        assert_eq!(strategy.size_position(Signal::Sell, &ctx(&series, 5, dec!(1000), 10)), None);
    }

    #[test]
    fn declares_indicators() {
        let strategy = MomentumRiskStrategy::new(&StrategyParams::default());
        assert_eq!(
            strategy.indicators(),
            vec![
                IndicatorType::Ema(10),
                IndicatorType::Ema(50),
                IndicatorType::Rsi(14),
                IndicatorType::Atr(14),
            ]
        );
    }
}
