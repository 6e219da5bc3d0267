//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9. Both EMAs are defined
//! from the first bar, so all three outputs are too.

use crate::domain::indicator::{calculate_ema, ema_of, IndicatorType, IndicatorValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub fast: usize,
    pub slow: usize,
    pub signal_period: usize,
    pub line: Vec<IndicatorValue>,
    pub signal: Vec<IndicatorValue>,
    pub histogram: Vec<IndicatorValue>,
}

impl Macd {
    pub fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Macd {
            fast: self.fast,
            slow: self.slow,
            signal: self.signal_period,
        }
    }
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> Macd {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let line: Vec<IndicatorValue> = ema_fast
        .values
        .iter()
        .zip(&ema_slow.values)
        .map(|(f, s)| f.zip_with(*s, |a, b| a - b))
        .collect();
    let signal = ema_of(&line, signal_period);
    let histogram = line
        .iter()
        .zip(&signal)
        .map(|(l, s)| l.zip_with(*s, |a, b| a - b))
        .collect();

    Macd {
        fast,
        slow,
        signal_period,
        line,
        signal,
        histogram,
    }
}
