//! Average True Range over a simple window, using the prior bar's adjusted
//! close as the reference close.

use crate::domain::price_bar::PriceBar;
use rust_decimal::Decimal;

pub fn atr(bars: &[PriceBar], end_index: usize, period: usize) -> Option<Decimal> {
    if period == 0 || end_index < period || end_index >= bars.len() {
        return None;
    }

    let sum: Decimal = (end_index + 1 - period..=end_index)
        .map(|i| bars[i].true_range(bars[i - 1].adj_close))
        .sum();
    Some(sum / Decimal::from(period))
}
