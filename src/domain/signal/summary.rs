//! Signal reporting: latest decision and distribution of final signals.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

use crate::domain::ohlcv::Series;
use crate::domain::signal::SignalSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl From<i8> for Recommendation {
    fn from(signal: i8) -> Self {
        match signal {
            1 => Recommendation::Buy,
            -1 => Recommendation::Sell,
            _ => Recommendation::Hold,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => f.write_str("BUY"),
            Recommendation::Sell => f.write_str("SELL"),
            Recommendation::Hold => f.write_str("HOLD"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestSignal {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub sma_cross: i8,
    pub ema_cross: i8,
    pub rsi: i8,
    pub bollinger: i8,
    pub combined: f64,
    pub final_signal: i8,
    pub recommendation: Recommendation,
}

impl LatestSignal {
    /// Signals on the last bar, or `None` for an empty series.
    pub fn from_set(series: &Series, signals: &SignalSet) -> Option<Self> {
        let bar = series.last()?;
        let i = signals.len().checked_sub(1)?;
        let final_signal = signals.final_signal[i];
        Some(Self {
            timestamp: bar.timestamp,
            price: bar.close,
            sma_cross: signals.sma_cross[i],
            ema_cross: signals.ema_cross[i],
            rsi: signals.rsi[i],
            bollinger: signals.bollinger[i],
            combined: signals.combined[i],
            final_signal,
            recommendation: Recommendation::from(final_signal),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSummary {
    pub total_periods: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub hold_signals: usize,
    pub buy_percentage: f64,
    pub sell_percentage: f64,
    pub hold_percentage: f64,
}

impl SignalSummary {
    pub fn from_final(final_signal: &[i8]) -> Self {
        let buy_signals = final_signal.iter().filter(|&&s| s == 1).count();
        let sell_signals = final_signal.iter().filter(|&&s| s == -1).count();
        let total_periods = final_signal.len();
        let hold_signals = total_periods - buy_signals - sell_signals;

        let pct = |count: usize| {
            if total_periods > 0 {
                count as f64 / total_periods as f64 * 100.0
            } else {
                0.0
            }
        };

        Self {
            total_periods,
            buy_signals,
            sell_signals,
            hold_signals,
            buy_percentage: pct(buy_signals),
            sell_percentage: pct(sell_signals),
            hold_percentage: pct(hold_signals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PriceBar;
    use chrono::NaiveDate;

    #[test]
    fn summary_counts() {
        let s = SignalSummary::from_final(&[1, 0, 0, -1, 1, 0, 0, 0]);
        assert_eq!(s.total_periods, 8);
        assert_eq!(s.buy_signals, 2);
        assert_eq!(s.sell_signals, 1);
        assert_eq!(s.hold_signals, 5);
        assert!((s.buy_percentage - 25.0).abs() < 1e-12);
        assert!((s.hold_percentage - 62.5).abs() < 1e-12);
    }

    #[test]
    fn summary_empty() {
        let s = SignalSummary::from_final(&[]);
        assert_eq!(s.total_periods, 0);
        assert_eq!(s.buy_percentage, 0.0);
        assert_eq!(s.sell_percentage, 0.0);
        assert_eq!(s.hold_percentage, 0.0);
    }

    #[test]
    fn recommendation_from_signal() {
        assert_eq!(Recommendation::from(1), Recommendation::Buy);
        assert_eq!(Recommendation::from(-1), Recommendation::Sell);
        assert_eq!(Recommendation::from(0), Recommendation::Hold);
        assert_eq!(Recommendation::Sell.to_string(), "SELL");
    }

    #[test]
    fn latest_signal_reads_last_bar() {
        let t0 = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let bars: Vec<PriceBar> = [100.0, 101.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: t0 + chrono::Duration::hours(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
            })
            .collect();
        let series = Series::new(bars).unwrap();
        let set = SignalSet {
            timestamps: series.timestamps(),
            sma_cross: vec![0, 1],
            ema_cross: vec![0, 1],
            rsi: vec![0, 0],
            bollinger: vec![0, -1],
            combined: vec![0.0, 0.25],
            final_signal: vec![0, 1],
        };

        let latest = LatestSignal::from_set(&series, &set).unwrap();
        assert_eq!(latest.price, 101.0);
        assert_eq!(latest.bollinger, -1);
        assert_eq!(latest.recommendation, Recommendation::Buy);
    }

    #[test]
    fn latest_signal_empty() {
        assert!(LatestSignal::from_set(&Series::default(), &SignalSet::default()).is_none());
    }
}
