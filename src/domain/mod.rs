//! Core domain types and logic: indicators, signals, backtest and metrics.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod backtest;
pub mod metrics;
pub mod config;
pub mod config_validation;
pub mod pipeline;
pub mod error;
