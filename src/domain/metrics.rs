//! Performance statistics over a simulated value series.
//!
//! Values are exact decimals; every statistic is `f64`. Nothing here guards
//! zero variance or a zero previous value, so non-finite results reach the
//! report as-is.

use crate::domain::simulator::SimulationResult;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// `(current - previous) / previous`, or `None` when `previous` is zero.
pub(crate) fn relative_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    (current - previous).checked_div(previous)
}

/// Largest peak-to-trough decline as a fraction of the running peak.
///
/// The peak starts at the first value. Returns 0 for an empty or never
/// declining series.
pub fn max_drawdown<T: ToPrimitive>(values: &[T]) -> f64 {
    let mut iter = values.iter().map(|v| v.to_f64().unwrap_or(f64::NAN));
    let Some(mut peak) = iter.next() else {
        return 0.0;
    };

    let mut max_dd = 0.0_f64;
    for value in iter {
        if value > peak {
            peak = value;
        }
        let dd = (peak - value) / peak;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Simple daily returns. The first entry is 0; a zero previous value gives a
/// non-finite return.
pub fn daily_returns(values: &[Decimal]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut returns = Vec::with_capacity(values.len());
    returns.push(0.0);
    returns.extend(values.windows(2).map(|w| {
        relative_change(w[1], w[0])
            .and_then(|r| r.to_f64())
            .unwrap_or_else(|| {
                let prev = w[0].to_f64().unwrap_or(0.0);
                let curr = w[1].to_f64().unwrap_or(0.0);
                (curr - prev) / prev
            })
    }));
    returns
}

/// Fraction of returns that are strictly positive.
pub fn accuracy(returns: &[f64]) -> f64 {
    let positive = returns.iter().filter(|&&r| r > 0.0).count();
    positive as f64 / returns.len() as f64
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean over population standard deviation of daily returns.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let m = mean(returns);
    let variance = returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / returns.len() as f64;
    m / variance.sqrt()
}

pub fn annualized_sharpe(returns: &[f64]) -> f64 {
    sharpe_ratio(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Ordinary least squares of strategy returns on market returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub alpha: f64,
    pub beta: f64,
}

/// Regress `strategy` on `market`, dropping the first `window` market entries
/// so both series start on the first simulated day.
///
/// Uses sample (`n - 1`) covariance and variance over the overlapping length.
pub fn regression(strategy: &[f64], market: &[f64], window: usize) -> Regression {
    let market = market.get(window..).unwrap_or(&[]);
    let n = strategy.len().min(market.len());
    let (strategy, market) = (&strategy[..n], &market[..n]);

    let mean_s = mean(strategy);
    let mean_m = mean(market);
    let denom = n as f64 - 1.0;

    let covariance = strategy
        .iter()
        .zip(market)
        .map(|(s, m)| (s - mean_s) * (m - mean_m))
        .sum::<f64>()
        / denom;
    let variance = market.iter().map(|m| (m - mean_m).powi(2)).sum::<f64>() / denom;

    let beta = covariance / variance;
    Regression {
        alpha: mean_s - beta * mean_m,
        beta,
    }
}

/// Everything the backtest report prints, plus a few counters for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub strategy: String,
    pub initial_capital: Decimal,
    pub final_capital: Decimal,
    pub total_return: f64,
    pub alpha: f64,
    pub beta: f64,
    pub accuracy: f64,
    pub max_drawdown: f64,
    pub annualized_sharpe: f64,
    pub days: usize,
    pub trades: usize,
}

impl PerformanceReport {
    pub fn compute(result: &SimulationResult, market_returns: &[f64]) -> Self {
        let values = result.values.values();
        let returns = daily_returns(&values);
        let Regression { alpha, beta } = regression(&returns, market_returns, result.start_day);

        let final_capital = result.final_capital();
        let total_return = relative_change(final_capital, result.initial_capital)
            .and_then(|r| r.to_f64())
            .unwrap_or(f64::NAN);

        PerformanceReport {
            strategy: result.strategy.clone(),
            initial_capital: result.initial_capital,
            final_capital,
            total_return,
            alpha,
            beta,
            accuracy: accuracy(&returns),
            max_drawdown: max_drawdown(&values),
            annualized_sharpe: annualized_sharpe(&returns),
            days: values.len(),
            trades: result.trades.len(),
        }
    }
}
