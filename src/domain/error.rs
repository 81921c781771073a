//! Domain error types.

/// Top-level error type for stratbench.
#[derive(Debug, thiserror::Error)]
pub enum StratbenchError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to read price data from {path}: {reason}")]
    DataRead { path: String, reason: String },

    #[error("invalid price data format: {reason}")]
    DataFormat { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("price series for {symbol} is not strictly increasing at {date}")]
    UnorderedSeries { symbol: String, date: chrono::NaiveDate },

    #[error(transparent)]
    Universe(#[from] crate::domain::universe::UniverseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StratbenchError> for std::process::ExitCode {
    fn from(err: &StratbenchError) -> Self {
        let code: u8 = match err {
            StratbenchError::Io(_) => 1,
            StratbenchError::ConfigParse { .. }
            | StratbenchError::ConfigMissing { .. }
            | StratbenchError::ConfigInvalid { .. }
            | StratbenchError::Universe(_) => 2,
            StratbenchError::DataRead { .. }
            | StratbenchError::DataFormat { .. }
            | StratbenchError::UnorderedSeries { .. } => 3,
            StratbenchError::NoData { .. } | StratbenchError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
