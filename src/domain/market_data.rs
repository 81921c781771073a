//! Ordered collection of price series shared by every component of a run.

use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

/// All series of one run, sorted by symbol. Every loop over symbols goes
/// through this ordering so results do not depend on hash order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketData {
    series: Vec<PriceSeries>,
}

impl MarketData {
    /// Sorts by symbol. A repeated symbol keeps its first series.
    pub fn new(mut series: Vec<PriceSeries>) -> Self {
        series.sort_by(|a, b| a.symbol().cmp(b.symbol()));
        series.dedup_by(|later, earlier| later.symbol() == earlier.symbol());
        Self { series }
    }

    pub fn series(&self) -> &[PriceSeries] {
        &self.series
    }

    pub fn symbols(&self) -> impl ExactSizeIterator<Item = &str> {
        self.series.iter().map(|s| s.symbol())
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.series
            .binary_search_by(|s| s.symbol().cmp(symbol))
            .ok()
            .map(|i| &self.series[i])
    }

    pub fn symbol_count(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of bars in the first series. The simulator and benchmark take
    /// this as the length of every series.
    pub fn trading_days(&self) -> usize {
        self.series.first().map_or(0, |s| s.len())
    }

    pub fn date_at(&self, day: usize) -> Option<NaiveDate> {
        self.series.first()?.bar(day).map(|b| b.date)
    }

    /// True when every series has the same dates as the first one.
    pub fn is_aligned(&self) -> bool {
        match self.series.split_first() {
            None => true,
            Some((first, rest)) => rest.iter().all(|s| s.dates().eq(first.dates())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_bar::PriceBar;
    use rust_decimal::Decimal;

    fn make_series(symbol: &str, days: &[u32]) -> PriceSeries {
        let bars = days
            .iter()
            .map(|&d| PriceBar {
                symbol: symbol.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                open: Decimal::ONE,
                high: Decimal::ONE,
                low: Decimal::ONE,
                close: Decimal::ONE,
                adj_close: Decimal::ONE,
                volume: 100,
            })
            .collect();
        PriceSeries::new(symbol, bars).unwrap()
    }

    #[test]
    fn sorts_symbols_lexicographically() {
        let data = MarketData::new(vec![
            make_series("MSFT", &[1, 2]),
            make_series("AAPL", &[1, 2]),
            make_series("GOOGL", &[1, 2]),
        ]);
        let symbols: Vec<&str> = data.symbols().collect();
        assert_eq!(symbols, vec!["AAPL", "GOOGL", "MSFT"]);
    }

    #[test]
    fn duplicate_symbol_keeps_first() {
        let data = MarketData::new(vec![
            make_series("AAPL", &[1, 2, 3]),
            make_series("AAPL", &[1]),
        ]);
        assert_eq!(data.symbol_count(), 1);
        assert_eq!(data.get("AAPL").unwrap().len(), 3);
    }

    #[test]
    fn get_by_symbol() {
        let data = MarketData::new(vec![make_series("MSFT", &[1]), make_series("AAPL", &[1, 2])]);
        assert_eq!(data.get("AAPL").unwrap().len(), 2);
        assert!(data.get("TSLA").is_none());
    }

    #[test]
    fn trading_days_from_first_symbol() {
        let data = MarketData::new(vec![make_series("B", &[1, 2]), make_series("A", &[1, 2, 3])]);
        assert_eq!(data.trading_days(), 3);
        assert_eq!(data.date_at(2), NaiveDate::from_ymd_opt(2024, 1, 3));
        assert_eq!(data.date_at(3), None);
    }

    #[test]
    fn alignment() {
        let aligned = MarketData::new(vec![make_series("A", &[1, 2]), make_series("B", &[1, 2])]);
        assert!(aligned.is_aligned());

        let shifted = MarketData::new(vec![make_series("A", &[1, 2]), make_series("B", &[1, 3])]);
        assert!(!shifted.is_aligned());

        let shorter = MarketData::new(vec![make_series("A", &[1, 2]), make_series("B", &[1])]);
        assert!(!shorter.is_aligned());

        assert!(MarketData::default().is_aligned());
        assert_eq!(MarketData::default().trading_days(), 0);
    }
}
