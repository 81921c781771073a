//! Simple moving average over a trailing window that excludes the current bar.

use crate::domain::price_bar::PriceBar;
use rust_decimal::Decimal;

/// Mean adjusted close over `[end_index - window, end_index - 1]`.
pub fn sma(bars: &[PriceBar], end_index: usize, window: usize) -> Option<Decimal> {
    if window == 0 || end_index < window || end_index > bars.len() {
        return None;
    }

    let sum: Decimal = bars[end_index - window..end_index]
        .iter()
        .map(|b| b.adj_close)
        .sum();
    Some(sum / Decimal::from(window))
}
