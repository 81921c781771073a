//! Daily price bar.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One trading day for one symbol. Prices are exact decimals as read from the
/// source file.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub adj_close: Decimal,
    pub volume: i64,
}

impl PriceBar {
    /// max(high - low, |high - prev_adj_close|, |low - prev_adj_close|)
    pub fn true_range(&self, prev_adj_close: Decimal) -> Decimal {
        let hl = self.high - self.low;
        let hc = (self.high - prev_adj_close).abs();
        let lc = (self.low - prev_adj_close).abs();
        hl.max(hc).max(lc)
    }
}
