//! Equal-weighted market benchmark.

use crate::domain::market_data::MarketData;
use crate::domain::metrics::relative_change;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Daily market return: the mean over all symbols of each symbol's simple
/// adjusted-close return. Day 0 is 0.
///
/// The length follows the first symbol's series. A day where any symbol has a
/// zero previous close is NaN.
pub fn market_returns(data: &MarketData) -> Vec<f64> {
    let days = data.trading_days();
    if days == 0 {
        return Vec::new();
    }

    let count = Decimal::from(data.symbol_count());
    let mut returns = Vec::with_capacity(days);
    returns.push(0.0);

    for day in 1..days {
        let total = data.series().iter().try_fold(Decimal::ZERO, |acc, series| {
            relative_change(series.adj_close(day), series.adj_close(day - 1)).map(|r| acc + r)
        });
        returns.push(
            total
                .and_then(|t| (t / count).to_f64())
                .unwrap_or(f64::NAN),
        );
    }

    returns
}
