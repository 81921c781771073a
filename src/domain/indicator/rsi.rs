//! Relative Strength Index over a simple (non-smoothed) window.
//!
//! Gains and losses are summed over the adjusted-close changes in
//! `[end - n + 1, end]`. RSI = 100 - 100 / (1 + avg_gain / avg_loss), and
//! exactly 100 when the window has no losses.

use crate::domain::price_bar::PriceBar;
use rust_decimal::Decimal;

pub fn rsi(bars: &[PriceBar], end_index: usize, period: usize) -> Option<Decimal> {
    if period == 0 || end_index < period || end_index >= bars.len() {
        return None;
    }

    let mut gain_sum = Decimal::ZERO;
    let mut loss_sum = Decimal::ZERO;
    for i in end_index + 1 - period..=end_index {
        let change = bars[i].adj_close - bars[i - 1].adj_close;
        if change > Decimal::ZERO {
            gain_sum += change;
        } else {
            loss_sum += change.abs();
        }
    }

    if loss_sum.is_zero() {
        return Some(Decimal::ONE_HUNDRED);
    }

    let n = Decimal::from(period);
    let avg_gain = gain_sum / n;
    let avg_loss = loss_sum / n;
    let rs = avg_gain / avg_loss;
    Some(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (rs + Decimal::ONE))
}
