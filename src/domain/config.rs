//! Immutable run configuration.
//!
//! One value is built per run and handed to each engine's constructor.
//! There is no process-wide configuration state.

use std::collections::BTreeSet;

use crate::domain::backtest::{BacktestConfig, BalanceCheckPolicy};
use crate::domain::signal::SignalRule;

pub const DEFAULT_SMA_PERIODS: [usize; 2] = [20, 50];
pub const DEFAULT_EMA_PERIODS: [usize; 2] = [12, 26];
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_STDDEV: f64 = 2.0;
pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_stddev: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_periods: DEFAULT_SMA_PERIODS.to_vec(),
            ema_periods: DEFAULT_EMA_PERIODS.to_vec(),
            rsi_period: DEFAULT_RSI_PERIOD,
            bollinger_period: DEFAULT_BOLLINGER_PERIOD,
            bollinger_stddev: DEFAULT_BOLLINGER_STDDEV,
            macd_fast: DEFAULT_MACD_FAST,
            macd_slow: DEFAULT_MACD_SLOW,
            macd_signal: DEFAULT_MACD_SIGNAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub active_rules: BTreeSet<SignalRule>,
    /// `combined >= buy_threshold` yields a buy.
    pub buy_threshold: f64,
    /// `combined <= sell_threshold` yields a sell.
    pub sell_threshold: f64,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            active_rules: SignalRule::ALL.into_iter().collect(),
            buy_threshold: 0.25,
            sell_threshold: -0.25,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub indicators: IndicatorParams,
    pub signals: SignalParams,
    pub backtest: BacktestConfig,
    /// Bars per year; depends on bar frequency and market hours.
    pub sharpe_annualization_factor: f64,
}

impl PipelineConfig {
    /// Conventional indicator and signal settings. The balance policy and
    /// annualization factor have no sensible default and must be chosen.
    pub fn new(balance_check: BalanceCheckPolicy, sharpe_annualization_factor: f64) -> Self {
        Self {
            indicators: IndicatorParams::default(),
            signals: SignalParams::default(),
            backtest: BacktestConfig::new(balance_check),
            sharpe_annualization_factor,
        }
    }
}
