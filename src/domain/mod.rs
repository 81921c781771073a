//! Core domain types and logic.

pub mod backtest;
pub mod benchmark;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod market_data;
pub mod metrics;
pub mod portfolio;
pub mod price_bar;
pub mod price_series;
pub mod simulator;
pub mod strategy;
pub mod universe;
