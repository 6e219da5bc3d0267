//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first value, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Recurrence-based: defined from the first bar, no warmup.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_ema(closes: &[f64], period: usize) -> IndicatorSeries {
    let input: Vec<IndicatorValue> = closes.iter().map(|&c| IndicatorValue::Defined(c)).collect();
    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values: ema_of(&input, period),
    }
}

/// EMA over an indicator array. Seeds at the first defined slot; undefined
/// slots produce undefined output and leave the running average untouched.
pub fn ema_of(input: &[IndicatorValue], period: usize) -> Vec<IndicatorValue> {
    if period == 0 {
        return vec![IndicatorValue::Undefined; input.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema: Option<f64> = None;

    input
        .iter()
        .map(|slot| match slot.value() {
            None => IndicatorValue::Undefined,
            Some(x) => {
                let next = match ema {
                    None => x,
                    Some(prev) => x * k + prev * (1.0 - k),
                };
                ema = Some(next);
                IndicatorValue::Defined(next)
            }
        })
        .collect()
}
