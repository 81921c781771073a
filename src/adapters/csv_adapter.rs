//! Consolidated CSV price file adapter.
//!
//! One file holds every symbol, one bar per row:
//! `Date,Open,High,Low,Close,Adj Close,Volume,Ticker`. The file is parsed once
//! on open; malformed rows are skipped with a warning.

use crate::domain::error::StratbenchError;
use crate::domain::price_bar::PriceBar;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::PriceProvider;
use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

const COLUMNS: usize = 8;
const TICKER_COLUMN: usize = 7;

pub struct CsvAdapter {
    path: PathBuf,
    bars: BTreeMap<String, Vec<PriceBar>>,
}

impl CsvAdapter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StratbenchError> {
        let path = path.as_ref().to_path_buf();
        let read_err = |e: csv::Error| StratbenchError::DataRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(read_err)?;

        let headers = rdr.headers().map_err(read_err)?;
        if headers.len() < COLUMNS
            || !headers
                .get(TICKER_COLUMN)
                .is_some_and(|h| h.trim().eq_ignore_ascii_case("ticker"))
        {
            return Err(StratbenchError::DataFormat {
                reason: format!(
                    "{}: expected {} columns with Ticker as the eighth",
                    path.display(),
                    COLUMNS
                ),
            });
        }

        let mut bars: BTreeMap<String, Vec<PriceBar>> = BTreeMap::new();
        let mut skipped = 0usize;
        for (index, result) in rdr.records().enumerate() {
            // header is line 1
            let line = index + 2;
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warn!(line, error = %e, "skipping unreadable row");
                    skipped += 1;
                    continue;
                }
            };
            match parse_row(&record) {
                Ok(bar) => bars.entry(bar.symbol.clone()).or_default().push(bar),
                Err(reason) => {
                    warn!(line, reason = reason.as_str(), "skipping malformed row");
                    skipped += 1;
                }
            }
        }

        for (symbol, series) in bars.iter_mut() {
            // stable sort keeps the first row of a repeated date in front
            series.sort_by_key(|b| b.date);
            let before = series.len();
            series.dedup_by_key(|b| b.date);
            if series.len() < before {
                warn!(
                    symbol = symbol.as_str(),
                    dropped = before - series.len(),
                    "dropped rows with repeated dates"
                );
            }
        }

        info!(
            path = %path.display(),
            symbols = bars.len(),
            skipped,
            "loaded price file"
        );
        Ok(Self { path, bars })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_row(record: &StringRecord) -> Result<PriceBar, String> {
    if record.len() < COLUMNS {
        return Err(format!("expected {} columns, found {}", COLUMNS, record.len()));
    }
    let field = |i: usize| record.get(i).unwrap_or_default();

    let date = NaiveDate::parse_from_str(field(0).trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date {:?}: {}", field(0), e))?;
    let symbol = field(TICKER_COLUMN).trim().to_uppercase();
    if symbol.is_empty() {
        return Err("empty ticker".to_string());
    }
    let volume = field(6)
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid volume {:?}: {}", field(6), e))?;

    Ok(PriceBar {
        symbol,
        date,
        open: parse_price(field(1), "open")?,
        high: parse_price(field(2), "high")?,
        low: parse_price(field(3), "low")?,
        close: parse_price(field(4), "close")?,
        adj_close: parse_price(field(5), "adj close")?,
        volume,
    })
}

fn parse_price(value: &str, column: &str) -> Result<Decimal, String> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| format!("invalid {column} {value:?}: {e}"))
}

impl PriceProvider for CsvAdapter {
    fn list_symbols(&self) -> Result<Vec<String>, StratbenchError> {
        Ok(self.bars.keys().cloned().collect())
    }

    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, StratbenchError> {
        let bars = self
            .bars
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start && b.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        PriceSeries::new(symbol, bars)
    }
}
