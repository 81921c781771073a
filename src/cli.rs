//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::adapters::console_report::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestOutcome, run_backtest};
use crate::domain::config_validation::{load_backtest_config, validate_backtest_config};
use crate::domain::error::StratbenchError;
use crate::domain::strategy::StrategyKind;
use crate::domain::universe::parse_symbols;
use crate::ports::data_port::PriceProvider;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stratbench", about = "Daily equity strategy backtester")]
pub struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and print the report
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// List the symbols in a price file
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Consolidated price CSV
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Validate a configuration file without running
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Consolidated price CSV
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// crossover or momentum
    #[arg(short, long)]
    pub strategy: Option<StrategyKind>,
    /// Comma-separated symbol filter
    #[arg(long)]
    pub symbols: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Backtest { config, overrides } => {
            run_backtest_command(config.as_deref(), &overrides)
        }
        Command::ListSymbols { config, data } => run_list_symbols(config.as_deref(), data),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` picks the filter unless
/// `verbose` forces debug; the default is info.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // a subscriber may already be installed when embedded or under test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StratbenchError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Config file values (or defaults when no file is given) with command-line
/// overrides applied, validated.
pub fn resolve_backtest_config(
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<BacktestConfig, StratbenchError> {
    let mut config = match config_path {
        Some(path) => load_backtest_config(&load_config(path)?)?,
        None => BacktestConfig::default(),
    };

    if let Some(data) = &overrides.data {
        config.data_path = Some(data.clone());
    }
    if let Some(strategy) = overrides.strategy {
        config.strategy = strategy;
    }
    if let Some(symbols) = &overrides.symbols {
        config.symbols = Some(parse_symbols(symbols)?);
    }

    validate_backtest_config(&config)?;
    Ok(config)
}

fn require_data_path(config: &BacktestConfig) -> Result<&Path, StratbenchError> {
    config
        .data_path
        .as_deref()
        .ok_or_else(|| StratbenchError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

/// Run the configured backtest against `provider` and write the report.
pub fn execute_backtest(
    provider: &dyn PriceProvider,
    config: &BacktestConfig,
    report: &mut dyn ReportPort,
) -> Result<BacktestOutcome, StratbenchError> {
    let outcome = run_backtest(provider, config)?;
    for trade in &outcome.simulation.trades {
        debug!(
            date = %trade.date,
            symbol = trade.symbol.as_str(),
            side = %trade.side,
            quantity = trade.quantity,
            price = %trade.price,
            "trade"
        );
    }
    report.write(&outcome.report, &config.params)?;
    Ok(outcome)
}

fn run_backtest_command(
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<(), StratbenchError> {
    let config = resolve_backtest_config(config_path, overrides)?;
    let provider = CsvAdapter::open(require_data_path(&config)?)?;
    let mut report = ConsoleReportAdapter::stdout();
    execute_backtest(&provider, &config, &mut report)?;
    Ok(())
}

fn run_list_symbols(config_path: Option<&Path>, data: Option<PathBuf>) -> Result<(), StratbenchError> {
    let overrides = Overrides {
        data,
        ..Overrides::default()
    };
    let config = resolve_backtest_config(config_path, &overrides)?;
    let provider = CsvAdapter::open(require_data_path(&config)?)?;

    let symbols = provider.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found in {}", provider.path().display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), StratbenchError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = resolve_backtest_config(Some(config_path), &Overrides::default())?;
    let strategy = config.strategy.build(&config.params);

    let indicators: Vec<String> = strategy.indicators().iter().map(|i| i.to_string()).collect();

    eprintln!("\nStrategy: {} ({})", config.strategy, strategy.name());
    eprintln!("  indicators: {}", indicators.join(", "));
    eprintln!("  initial capital: {}", config.initial_capital);
    eprintln!("  date range: {} to {}", config.start_date, config.end_date);
    match &config.data_path {
        Some(path) => eprintln!("  data: {}", path.display()),
        None => eprintln!("  data: (not set, pass --data)"),
    }
    match &config.symbols {
        Some(symbols) => eprintln!("  symbols: {}", symbols.join(", ")),
        None => eprintln!("  symbols: all in data file"),
    }

    eprintln!("\nConfiguration is valid");
    Ok(())
}
