//! Configuration loading and validation.
//!
//! Missing keys fall back to the defaults in [`BacktestConfig::default`];
//! present keys must parse and pass the range checks before a run.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::StratbenchError;
use crate::domain::strategy::{StrategyKind, StrategyParams};
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// Read `[data]` and `[backtest]` into a validated config.
pub fn load_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, StratbenchError> {
    let defaults = BacktestConfig::default();
    let p = &defaults.params;

    let symbols = match config.get_string("data", "symbols") {
        Some(s) if !s.trim().is_empty() => Some(parse_symbols(&s)?),
        _ => None,
    };

    let strategy = match config.get_string("backtest", "strategy") {
        Some(s) => {
            StrategyKind::from_str(&s).map_err(|reason| invalid("backtest", "strategy", reason))?
        }
        None => defaults.strategy,
    };

    let params = StrategyParams {
        short_window: read_window(config, "short_window", p.short_window)?,
        long_window: read_window(config, "long_window", p.long_window)?,
        rsi_period: read_window(config, "rsi_period", p.rsi_period)?,
        atr_period: read_window(config, "atr_period", p.atr_period)?,
        risk_per_trade: read_decimal(config, "risk_per_trade", p.risk_per_trade)?,
        atr_multiplier: read_decimal(config, "atr_multiplier", p.atr_multiplier)?,
        rsi_buy_floor: read_decimal(config, "rsi_buy_floor", p.rsi_buy_floor)?,
        rsi_sell_ceiling: read_decimal(config, "rsi_sell_ceiling", p.rsi_sell_ceiling)?,
    };

    let loaded = BacktestConfig {
        data_path: config
            .get_string("data", "path")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
        start_date: read_date(config, "start_date", defaults.start_date)?,
        end_date: read_date(config, "end_date", defaults.end_date)?,
        symbols,
        initial_capital: read_decimal(config, "initial_capital", defaults.initial_capital)?,
        strategy,
        params,
    };

    validate_backtest_config(&loaded)?;
    Ok(loaded)
}

/// Range checks on an assembled config.
pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), StratbenchError> {
    validate_dates(config)?;
    validate_initial_capital(config)?;
    validate_windows(&config.params)?;
    validate_risk(&config.params)?;
    validate_rsi_thresholds(&config.params)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> StratbenchError {
    StratbenchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn read_window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, StratbenchError> {
    match config.get_int("backtest", key) {
        Ok(None) => Ok(default),
        Ok(Some(v)) => usize::try_from(v)
            .map_err(|_| invalid("backtest", key, format!("{key} must be positive"))),
        Err(reason) => Err(invalid("backtest", key, reason)),
    }
}

fn read_decimal(
    config: &dyn ConfigPort,
    key: &str,
    default: Decimal,
) -> Result<Decimal, StratbenchError> {
    config
        .get_decimal("backtest", key)
        .map(|v| v.unwrap_or(default))
        .map_err(|reason| invalid("backtest", key, reason))
}

fn read_date(
    config: &dyn ConfigPort,
    key: &str,
    default: NaiveDate,
) -> Result<NaiveDate, StratbenchError> {
    match config.get_string("data", key) {
        None => Ok(default),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "data",
                key,
                format!("invalid {key} format, expected YYYY-MM-DD"),
            )
        }),
    }
}

fn validate_dates(config: &BacktestConfig) -> Result<(), StratbenchError> {
    if config.start_date >= config.end_date {
        return Err(invalid(
            "data",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

fn validate_initial_capital(config: &BacktestConfig) -> Result<(), StratbenchError> {
    if config.initial_capital <= Decimal::ZERO {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_windows(params: &StrategyParams) -> Result<(), StratbenchError> {
    for (key, value) in [
        ("short_window", params.short_window),
        ("long_window", params.long_window),
        ("rsi_period", params.rsi_period),
        ("atr_period", params.atr_period),
    ] {
        if value == 0 {
            return Err(invalid("backtest", key, format!("{key} must be positive")));
        }
    }
    if params.short_window >= params.long_window {
        return Err(invalid(
            "backtest",
            "short_window",
            "short_window must be less than long_window",
        ));
    }
    Ok(())
}

fn validate_risk(params: &StrategyParams) -> Result<(), StratbenchError> {
    if params.risk_per_trade <= Decimal::ZERO || params.risk_per_trade > Decimal::ONE {
        return Err(invalid(
            "backtest",
            "risk_per_trade",
            "risk_per_trade must be in (0, 1]",
        ));
    }
    if params.atr_multiplier <= Decimal::ZERO {
        return Err(invalid(
            "backtest",
            "atr_multiplier",
            "atr_multiplier must be positive",
        ));
    }
    Ok(())
}

fn validate_rsi_thresholds(params: &StrategyParams) -> Result<(), StratbenchError> {
    let hundred = Decimal::ONE_HUNDRED;
    for (key, value) in [
        ("rsi_buy_floor", params.rsi_buy_floor),
        ("rsi_sell_ceiling", params.rsi_sell_ceiling),
    ] {
        if value < Decimal::ZERO || value > hundred {
            return Err(invalid("backtest", key, format!("{key} must be in [0, 100]")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use rust_decimal_macros::dec;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid(content: &str, expected_key: &str) {
        match load_backtest_config(&make_config(content)) {
            Err(StratbenchError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_backtest_config(&make_config("")).unwrap();
        assert_eq!(config, BacktestConfig::default());
        assert_eq!(config.initial_capital, dec!(1000000));
        assert_eq!(config.params.long_window, 50);
    }

    #[test]
    fn full_config_is_read() {
        let content = r#"
[data]
path = prices.csv
start_date = 2021-03-01
end_date = 2023-06-30
symbols = aapl, msft

[backtest]
strategy = momentum
initial_capital = 250000.50
short_window = 5
long_window = 20
rsi_period = 7
atr_period = 10
risk_per_trade = 0.01
atr_multiplier = 2.5
rsi_buy_floor = 40
rsi_sell_ceiling = 60
"#;
        let config = load_backtest_config(&make_config(content)).unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("prices.csv")));
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert_eq!(config.end_date, NaiveDate::from_ymd_opt(2023, 6, 30).unwrap());
        assert_eq!(
            config.symbols,
            Some(vec!["AAPL".to_string(), "MSFT".to_string()])
        );
        assert_eq!(config.strategy, StrategyKind::Momentum);
        assert_eq!(config.initial_capital, dec!(250000.50));
        assert_eq!(
            config.params,
            StrategyParams {
                short_window: 5,
                long_window: 20,
                rsi_period: 7,
                atr_period: 10,
                risk_per_trade: dec!(0.01),
                atr_multiplier: dec!(2.5),
                rsi_buy_floor: dec!(40),
                rsi_sell_ceiling: dec!(60),
            }
        );
    }

    #[test]
    fn unknown_strategy_fails() {
        assert_invalid("[backtest]\nstrategy = martingale\n", "strategy");
    }

    #[test]
    fn initial_capital_must_be_positive() {
        assert_invalid("[backtest]\ninitial_capital = 0\n", "initial_capital");
        assert_invalid("[backtest]\ninitial_capital = -5\n", "initial_capital");
    }

    #[test]
    fn non_numeric_capital_fails() {
        assert_invalid("[backtest]\ninitial_capital = lots\n", "initial_capital");
    }

    #[test]
    fn non_numeric_window_fails() {
        assert_invalid("[backtest]\nlong_window = fifty\n", "long_window");
    }

    #[test]
    fn negative_window_fails() {
        assert_invalid("[backtest]\nrsi_period = -3\n", "rsi_period");
    }

    #[test]
    fn zero_window_fails() {
        assert_invalid("[backtest]\natr_period = 0\n", "atr_period");
    }

    #[test]
    fn short_window_must_be_below_long() {
        assert_invalid(
            "[backtest]\nshort_window = 50\nlong_window = 50\n",
            "short_window",
        );
    }

    #[test]
    fn risk_per_trade_range() {
        assert_invalid("[backtest]\nrisk_per_trade = 0\n", "risk_per_trade");
        assert_invalid("[backtest]\nrisk_per_trade = 1.5\n", "risk_per_trade");
    }

    #[test]
    fn atr_multiplier_must_be_positive() {
        assert_invalid("[backtest]\natr_multiplier = 0\n", "atr_multiplier");
    }

    #[test]
    fn rsi_threshold_range() {
        assert_invalid("[backtest]\nrsi_sell_ceiling = 101\n", "rsi_sell_ceiling");
    }

    #[test]
    fn invalid_date_format_fails() {
        assert_invalid("[data]\nstart_date = 01/02/2020\n", "start_date");
    }

    #[test]
    fn start_after_end_fails() {
        assert_invalid(
            "[data]\nstart_date = 2024-01-01\nend_date = 2023-01-01\n",
            "start_date",
        );
    }

    #[test]
    fn bad_symbol_list_is_universe_error() {
        let result = load_backtest_config(&make_config("[data]\nsymbols = AAPL,,MSFT\n"));
        assert!(matches!(result, Err(StratbenchError::Universe(_))));
    }
}
