//! Price data port trait.

use crate::domain::error::StratbenchError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait PriceProvider {
    /// Every symbol the source holds, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, StratbenchError>;

    /// Bars for `symbol` with `start <= date <= end`, ascending by date. A
    /// symbol the source does not hold yields an empty series.
    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, StratbenchError>;
}
