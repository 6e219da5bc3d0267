//! Per-bar trading signals derived from indicators.
//!
//! Each rule yields -1 (sell), 0 (hold) or +1 (buy) per bar. The active rules
//! are averaged into a continuous COMBINED value, which buy/sell thresholds
//! turn into the FINAL decision consumed by the backtest.

pub mod crossover;
pub mod rules;
pub mod summary;

pub use crossover::crossover;
pub use rules::{bollinger_rule, rsi_rule};
pub use summary::{LatestSignal, Recommendation, SignalSummary};

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::domain::config::SignalParams;
use crate::domain::error::SigtraderError;
use crate::domain::indicator::{IndicatorSeries, IndicatorSet};
use crate::domain::ohlcv::Series;

/// Rules that can take part in the combined signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignalRule {
    SmaCross,
    EmaCross,
    Rsi,
    Bollinger,
}

impl SignalRule {
    pub const ALL: [SignalRule; 4] = [
        SignalRule::SmaCross,
        SignalRule::EmaCross,
        SignalRule::Rsi,
        SignalRule::Bollinger,
    ];

    pub fn kind(self) -> SignalKind {
        match self {
            SignalRule::SmaCross => SignalKind::SmaCross,
            SignalRule::EmaCross => SignalKind::EmaCross,
            SignalRule::Rsi => SignalKind::Rsi,
            SignalRule::Bollinger => SignalKind::Bollinger,
        }
    }
}

impl FromStr for SignalRule {
    type Err = SigtraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma_cross" => Ok(SignalRule::SmaCross),
            "ema_cross" => Ok(SignalRule::EmaCross),
            "rsi" => Ok(SignalRule::Rsi),
            "bollinger" => Ok(SignalRule::Bollinger),
            other => Err(SigtraderError::invalid_config(
                "active_rules",
                format!("unknown signal rule '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    SmaCross,
    EmaCross,
    Rsi,
    Bollinger,
    Combined,
    Final,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::SmaCross => "SMA_CROSS",
            SignalKind::EmaCross => "EMA_CROSS",
            SignalKind::Rsi => "RSI",
            SignalKind::Bollinger => "BOLLINGER",
            SignalKind::Combined => "COMBINED",
            SignalKind::Final => "FINAL",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub timestamp: NaiveDateTime,
    pub kind: SignalKind,
    /// -1, 0 or +1, except COMBINED which is the mean of the active rules.
    pub value: f64,
}

/// Per-bar signal arrays, all the same length as the bar series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalSet {
    pub timestamps: Vec<NaiveDateTime>,
    pub sma_cross: Vec<i8>,
    pub ema_cross: Vec<i8>,
    pub rsi: Vec<i8>,
    pub bollinger: Vec<i8>,
    pub combined: Vec<f64>,
    pub final_signal: Vec<i8>,
}

impl SignalSet {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn rule(&self, rule: SignalRule) -> &[i8] {
        match rule {
            SignalRule::SmaCross => &self.sma_cross,
            SignalRule::EmaCross => &self.ema_cross,
            SignalRule::Rsi => &self.rsi,
            SignalRule::Bollinger => &self.bollinger,
        }
    }

    /// Flattened audit trail: every kind for every bar, in bar order.
    pub fn to_signals(&self) -> Vec<Signal> {
        let mut out = Vec::with_capacity(self.len() * 6);
        for (i, &timestamp) in self.timestamps.iter().enumerate() {
            for rule in SignalRule::ALL {
                out.push(Signal {
                    timestamp,
                    kind: rule.kind(),
                    value: self.rule(rule)[i] as f64,
                });
            }
            out.push(Signal {
                timestamp,
                kind: SignalKind::Combined,
                value: self.combined[i],
            });
            out.push(Signal {
                timestamp,
                kind: SignalKind::Final,
                value: self.final_signal[i] as f64,
            });
        }
        out
    }
}

pub struct SignalEngine {
    params: SignalParams,
}

impl SignalEngine {
    pub fn new(params: SignalParams) -> Self {
        Self { params }
    }

    pub fn generate(&self, series: &Series, indicators: &IndicatorSet) -> SignalSet {
        let n = series.len();
        let closes = series.closes();

        let sma_cross = pair_crossover(&indicators.sma, n);
        let ema_cross = pair_crossover(&indicators.ema, n);
        let rsi = rsi_rule(
            &indicators.rsi.values,
            self.params.rsi_oversold,
            self.params.rsi_overbought,
        );
        let bollinger = bollinger_rule(&closes, &indicators.bollinger);

        let mut set = SignalSet {
            timestamps: series.timestamps(),
            sma_cross,
            ema_cross,
            rsi,
            bollinger,
            combined: Vec::with_capacity(n),
            final_signal: Vec::with_capacity(n),
        };

        let active: Vec<&[i8]> = self
            .params
            .active_rules
            .iter()
            .map(|&r| set.rule(r))
            .collect();
        let combined = combine(&active, n);
        let final_signal = combined
            .iter()
            .map(|&c| threshold(c, self.params.buy_threshold, self.params.sell_threshold))
            .collect();
        set.combined = combined;
        set.final_signal = final_signal;

        debug!(
            bars = n,
            buys = set.final_signal.iter().filter(|&&s| s == 1).count(),
            sells = set.final_signal.iter().filter(|&&s| s == -1).count(),
            "signals generated"
        );
        set
    }
}

/// Crossover of the first (short) over the second (long) series, or all
/// zeros when fewer than two are configured.
fn pair_crossover(series: &[IndicatorSeries], n: usize) -> Vec<i8> {
    match series {
        [short, long, ..] => crossover(&short.values, &long.values),
        _ => vec![0; n],
    }
}

/// Mean of the given rule arrays per bar.
fn combine(rules: &[&[i8]], n: usize) -> Vec<f64> {
    if rules.is_empty() {
        return vec![0.0; n];
    }
    (0..n)
        .map(|i| rules.iter().map(|r| r[i] as f64).sum::<f64>() / rules.len() as f64)
        .collect()
}

/// Thresholds are inclusive toward the signal.
fn threshold(combined: f64, buy: f64, sell: f64) -> i8 {
    if combined >= buy {
        1
    } else if combined <= sell {
        -1
    } else {
        0
    }
}
