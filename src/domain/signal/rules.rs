//! Threshold rules on single indicators.

use crate::domain::indicator::{BollingerBands, IndicatorValue};

/// +1 below `oversold`, -1 above `overbought`, 0 otherwise or when undefined.
pub fn rsi_rule(rsi: &[IndicatorValue], oversold: f64, overbought: f64) -> Vec<i8> {
    rsi.iter()
        .map(|slot| match slot.value() {
            Some(v) if v < oversold => 1,
            Some(v) if v > overbought => -1,
            _ => 0,
        })
        .collect()
}

/// +1 when the close touches or breaks the lower band, -1 for the upper band.
/// A close on both bands (flat window) is -1.
pub fn bollinger_rule(closes: &[f64], bands: &BollingerBands) -> Vec<i8> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let lower = bands.lower.get(i).and_then(|v| v.value());
            let upper = bands.upper.get(i).and_then(|v| v.value());
            match (lower, upper) {
                (_, Some(up)) if close >= up => -1,
                (Some(lo), _) if close <= lo => 1,
                _ => 0,
            }
        })
        .collect()
}
