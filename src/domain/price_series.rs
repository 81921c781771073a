//! Per-symbol price history.

use crate::domain::error::StratbenchError;
use crate::domain::price_bar::PriceBar;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Bars for one symbol, strictly increasing by date. Gaps in the calendar are
/// allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, StratbenchError> {
        let symbol = symbol.into();
        if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(StratbenchError::UnorderedSeries {
                symbol,
                date: w[1].date,
            });
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bar(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    /// Adjusted close at `index`. Panics when out of range, like slice indexing.
    pub fn adj_close(&self, index: usize) -> Decimal {
        self.bars[index].adj_close
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.bars.first()?.date, self.bars.last()?.date))
    }
}
