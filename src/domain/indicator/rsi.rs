//! RSI (Relative Strength Index).
//!
//! Average gain and average loss are simple means over the last n price
//! changes (rolling, not Wilder-smoothed).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are undefined (bar 0 has no price change).

use crate::domain::indicator::rolling::RollingWindow;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(closes.len());
    let mut gains = RollingWindow::new(period);
    let mut losses = RollingWindow::new(period);

    for (i, &close) in closes.iter().enumerate() {
        if i == 0 {
            values.push(IndicatorValue::Undefined);
            continue;
        }
        let change = close - closes[i - 1];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));

        let rsi = match (gains.mean(), losses.mean()) {
            (Some(avg_gain), Some(avg_loss)) => Some(rsi_from_averages(avg_gain, avg_loss)),
            _ => None,
        };
        values.push(IndicatorValue::from(rsi));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 {
        return 100.0;
    }
    let rs = avg_gain.max(0.0) / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
