//! OHLCV bar representation and the validated bar series.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::error::SigtraderError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    fn check_fields(&self, index: usize) -> Result<(), SigtraderError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SigtraderError::InvalidBar {
                    index,
                    reason: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Bars in strictly increasing timestamp order.
///
/// Construction is the only place ordering is checked; the core never sorts
/// or repairs input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    bars: Vec<PriceBar>,
}

impl Series {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SigtraderError> {
        for (i, bar) in bars.iter().enumerate() {
            bar.check_fields(i)?;
            if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
                return Err(SigtraderError::DataOrderingViolation {
                    index: i,
                    previous: bars[i - 1].timestamp,
                    current: bar.timestamp,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}
