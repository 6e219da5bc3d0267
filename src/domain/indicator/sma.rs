//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::rolling::RollingWindow;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_sma(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut window = RollingWindow::new(period);
    let values = closes
        .iter()
        .map(|&close| {
            window.push(close);
            IndicatorValue::from(window.mean())
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
