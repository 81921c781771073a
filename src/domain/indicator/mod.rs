//! Point-in-time technical indicators.
//!
//! Each indicator is evaluated at a single bar index over a fixed window and
//! returns `None` when the window does not fit inside the series. All
//! arithmetic is exact decimal arithmetic on the adjusted close.
//!
//! Window conventions differ on purpose:
//! - SMA averages `[end - n, end - 1]` and never sees the bar at `end`.
//! - EMA seeds from that SMA and then folds in `[end - n + 1, end]`, so the
//!   bar at `end` is included.
//! - RSI and ATR use the changes over `[end - n + 1, end]`.

pub mod atr;
pub mod ema;
pub mod rsi;
pub mod sma;

use crate::domain::price_bar::PriceBar;
use rust_decimal::Decimal;
use std::fmt;

pub use atr::atr;
pub use ema::ema;
pub use rsi::rsi;
pub use sma::sma;

/// Indicator identity plus its window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
}

impl IndicatorType {
    pub fn period(&self) -> usize {
        match *self {
            IndicatorType::Sma(n)
            | IndicatorType::Ema(n)
            | IndicatorType::Rsi(n)
            | IndicatorType::Atr(n) => n,
        }
    }

    /// Evaluate this indicator at `end_index`.
    pub fn compute(&self, bars: &[PriceBar], end_index: usize) -> Option<Decimal> {
        match *self {
            IndicatorType::Sma(n) => sma(bars, end_index, n),
            IndicatorType::Ema(n) => ema(bars, end_index, n),
            IndicatorType::Rsi(n) => rsi(bars, end_index, n),
            IndicatorType::Atr(n) => atr(bars, end_index, n),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
        }
    }
}

/// Bars with every price set to `close`, one per day from 2024-01-01.
#[cfg(test)]
pub(crate) fn test_bars(closes: &[Decimal]) -> Vec<PriceBar> {
    use chrono::NaiveDate;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            symbol: "TEST".into(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume: 1000,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Sma(50).to_string(), "SMA(50)");
        assert_eq!(IndicatorType::Ema(10).to_string(), "EMA(10)");
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
        assert_eq!(IndicatorType::Atr(14).to_string(), "ATR(14)");
    }

    #[test]
    fn indicator_type_period() {
        assert_eq!(IndicatorType::Ema(10).period(), 10);
        assert_eq!(IndicatorType::Atr(14).period(), 14);
    }

    #[test]
    fn compute_dispatches() {
        let bars = test_bars(&[dec!(1), dec!(2), dec!(3), dec!(4)]);
        assert_eq!(IndicatorType::Sma(2).compute(&bars, 3), sma(&bars, 3, 2));
        assert_eq!(IndicatorType::Ema(2).compute(&bars, 3), ema(&bars, 3, 2));
        assert_eq!(IndicatorType::Rsi(2).compute(&bars, 3), Some(dec!(100)));
        assert_eq!(IndicatorType::Atr(2).compute(&bars, 3), Some(dec!(1)));
    }
}
