//! Exponential moving average.
//!
//! k = 2/(n+1). Seeded with the trailing SMA at the same index, then updated
//! with ema = price*k + ema*(1-k) for every bar in `[end - n + 1, end]`.

use crate::domain::indicator::sma::sma;
use crate::domain::price_bar::PriceBar;
use rust_decimal::Decimal;

pub fn ema(bars: &[PriceBar], end_index: usize, window: usize) -> Option<Decimal> {
    if end_index >= bars.len() {
        return None;
    }
    let mut ema = sma(bars, end_index, window)?;

    let k = Decimal::TWO / Decimal::from(window + 1);
    let keep = Decimal::ONE - k;
    for bar in &bars[end_index + 1 - window..=end_index] {
        ema = bar.adj_close * k + ema * keep;
    }
    Some(ema)
}
