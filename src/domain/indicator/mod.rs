//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorValue`: one slot of an indicator array, defined or not
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: a single-output indicator aligned with the bar series
//! - `IndicatorSet`: every indicator a run needs, computed by `IndicatorEngine`
//!
//! Every array has the same length as the input series and slot `i` depends
//! only on bars `0..=i`. A window longer than the series yields an
//! all-undefined array rather than an error.

pub mod rolling;
pub mod sma;
pub mod ema;
pub mod rsi;
pub mod bollinger;
pub mod macd;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::{calculate_ema, ema_of};
pub use macd::{calculate_macd, Macd};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

use crate::domain::config::IndicatorParams;
use crate::domain::ohlcv::Series;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IndicatorValue {
    /// Not enough history yet.
    #[default]
    Undefined,
    Defined(f64),
}

impl IndicatorValue {
    pub fn value(self) -> Option<f64> {
        match self {
            IndicatorValue::Defined(v) => Some(v),
            IndicatorValue::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, IndicatorValue::Defined(_))
    }

    /// Combine two slots; undefined if either side is.
    pub fn zip_with(self, other: IndicatorValue, f: impl Fn(f64, f64) -> f64) -> IndicatorValue {
        match (self, other) {
            (IndicatorValue::Defined(a), IndicatorValue::Defined(b)) => {
                IndicatorValue::Defined(f(a, b))
            }
            _ => IndicatorValue::Undefined,
        }
    }
}

impl From<Option<f64>> for IndicatorValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => IndicatorValue::Defined(v),
            None => IndicatorValue::Undefined,
        }
    }
}

impl Serialize for IndicatorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorValue>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bar-aligned indicator arrays for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    /// In configured order; the first two drive the SMA crossover rule.
    pub sma: Vec<IndicatorSeries>,
    /// In configured order; the first two drive the EMA crossover rule.
    pub ema: Vec<IndicatorSeries>,
    pub rsi: IndicatorSeries,
    pub bollinger: BollingerBands,
    pub macd: Macd,
}

impl IndicatorSet {
    pub fn sma(&self, period: usize) -> Option<&IndicatorSeries> {
        self.sma
            .iter()
            .find(|s| s.indicator_type == IndicatorType::Sma(period))
    }

    pub fn ema(&self, period: usize) -> Option<&IndicatorSeries> {
        self.ema
            .iter()
            .find(|s| s.indicator_type == IndicatorType::Ema(period))
    }

    /// Named columns for tabular export, in a stable order.
    pub fn columns(&self) -> Vec<(String, &[IndicatorValue])> {
        let mut cols: Vec<(String, &[IndicatorValue])> = Vec::new();
        for s in self.sma.iter().chain(self.ema.iter()) {
            cols.push((s.indicator_type.to_string(), &s.values));
        }
        cols.push((self.rsi.indicator_type.to_string(), &self.rsi.values));
        let boll = self.bollinger.indicator_type().to_string();
        cols.push((format!("{boll}.upper"), &self.bollinger.upper));
        cols.push((format!("{boll}.middle"), &self.bollinger.middle));
        cols.push((format!("{boll}.lower"), &self.bollinger.lower));
        let macd = self.macd.indicator_type().to_string();
        cols.push((format!("{macd}.line"), &self.macd.line));
        cols.push((format!("{macd}.signal"), &self.macd.signal));
        cols.push((format!("{macd}.histogram"), &self.macd.histogram));
        cols
    }
}

pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn compute(&self, series: &Series) -> IndicatorSet {
        let closes = series.closes();
        let p = &self.params;
        debug!(bars = closes.len(), "computing indicators");

        IndicatorSet {
            sma: p
                .sma_periods
                .iter()
                .map(|&period| calculate_sma(&closes, period))
                .collect(),
            ema: p
                .ema_periods
                .iter()
                .map(|&period| calculate_ema(&closes, period))
                .collect(),
            rsi: calculate_rsi(&closes, p.rsi_period),
            bollinger: calculate_bollinger(&closes, p.bollinger_period, p.bollinger_stddev),
            macd: calculate_macd(&closes, p.macd_fast, p.macd_slow, p.macd_signal),
        }
    }
}
