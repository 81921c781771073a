//! Symbol universe resolution.
//!
//! Parses symbol lists from configuration and loads the series that can take
//! part in an index-aligned run.

use crate::domain::error::StratbenchError;
use crate::domain::market_data::MarketData;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::PriceProvider;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{info, warn};

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Split a comma-separated list into trimmed, upper-cased symbols.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = BTreeSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize },
    /// Trading calendar differs from the first accepted symbol's.
    Misaligned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

pub struct UniverseBuild {
    pub data: MarketData,
    pub skipped: Vec<SkippedSymbol>,
}

/// Fetch `symbols` (or every symbol the provider lists) and keep the ones
/// with at least `min_bars` bars on a shared calendar.
///
/// Symbols are processed in lexicographic order; the first accepted symbol
/// fixes the calendar. Returns `InsufficientData` if nothing survives.
pub fn build_market_data(
    provider: &dyn PriceProvider,
    symbols: Option<&[String]>,
    start: NaiveDate,
    end: NaiveDate,
    min_bars: usize,
) -> Result<UniverseBuild, StratbenchError> {
    let mut requested = match symbols {
        Some(list) => list.to_vec(),
        None => provider.list_symbols()?,
    };
    requested.sort();
    requested.dedup();

    let mut accepted: Vec<PriceSeries> = Vec::new();
    let mut skipped = Vec::new();
    let mut skip = |symbol: &str, reason: SkipReason| {
        skipped.push(SkippedSymbol {
            symbol: symbol.to_string(),
            reason,
        })
    };

    for symbol in requested.iter().map(String::as_str) {
        let series = match provider.fetch_series(symbol, start, end) {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol, error = %e, "skipping symbol, fetch failed");
                skip(symbol, SkipReason::NoData);
                continue;
            }
        };

        if series.is_empty() {
            warn!(symbol, "skipping symbol, no data in range");
            skip(symbol, SkipReason::NoData);
            continue;
        }

        if series.len() < min_bars {
            warn!(
                symbol,
                bars = series.len(),
                minimum = min_bars,
                "skipping symbol, not enough bars"
            );
            skip(symbol, SkipReason::InsufficientBars { bars: series.len() });
            continue;
        }

        if let Some(first) = accepted.first() {
            if !series.dates().eq(first.dates()) {
                warn!(
                    symbol,
                    reference = first.symbol(),
                    "skipping symbol, trading calendar differs"
                );
                skip(symbol, SkipReason::Misaligned);
                continue;
            }
        }

        info!(symbol, bars = series.len(), "loaded symbol");
        accepted.push(series);
    }

    if accepted.is_empty() {
        return Err(StratbenchError::InsufficientData {
            symbol: "all".to_string(),
            bars: 0,
            minimum: min_bars,
        });
    }

    if !skipped.is_empty() {
        info!(
            used = accepted.len(),
            requested = requested.len(),
            "backtesting a subset of the requested symbols"
        );
    }

    Ok(UniverseBuild {
        data: MarketData::new(accepted),
        skipped,
    })
}
