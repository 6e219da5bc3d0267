//! Bollinger Bands.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are undefined.

use crate::domain::indicator::rolling::RollingWindow;
use crate::domain::indicator::{IndicatorType, IndicatorValue};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub period: usize,
    pub multiplier: f64,
    pub upper: Vec<IndicatorValue>,
    pub middle: Vec<IndicatorValue>,
    pub lower: Vec<IndicatorValue>,
}

impl BollingerBands {
    pub fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Bollinger {
            period: self.period,
            stddev_mult_x100: (self.multiplier * 100.0).round() as u32,
        }
    }
}

pub fn calculate_bollinger(closes: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let mut window = RollingWindow::new(period);
    let mut upper = Vec::with_capacity(closes.len());
    let mut middle = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());

    for &close in closes {
        window.push(close);
        let mid = window.mean();
        let band = window.sample_stddev().map(|sd| multiplier * sd);

        middle.push(IndicatorValue::from(mid));
        match (mid, band) {
            (Some(m), Some(b)) => {
                upper.push(IndicatorValue::Defined(m + b));
                lower.push(IndicatorValue::Defined(m - b));
            }
            _ => {
                upper.push(IndicatorValue::Undefined);
                lower.push(IndicatorValue::Undefined);
            }
        }
    }

    BollingerBands {
        period,
        multiplier,
        upper,
        middle,
        lower,
    }
}
