//! Performance metrics and statistics.

use serde::Serialize;

use super::portfolio::EquityPoint;
use super::position::{Trade, TradeAction};

/// Return/risk snapshot of a completed equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerformanceReport {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

pub struct PerformanceAnalyzer {
    annualization_factor: f64,
}

impl PerformanceAnalyzer {
    /// `annualization_factor` is the number of bars per year for the data's
    /// frequency (e.g. 252 for daily equities, 8760 for hourly crypto).
    pub fn new(annualization_factor: f64) -> Self {
        Self {
            annualization_factor,
        }
    }

    /// Empty and single-point curves give an all-zero report.
    pub fn analyze(&self, equity_curve: &[EquityPoint]) -> PerformanceReport {
        if equity_curve.len() < 2 {
            return PerformanceReport::default();
        }
        PerformanceReport {
            total_return: total_return(equity_curve),
            max_drawdown: max_drawdown(equity_curve),
            sharpe_ratio: sharpe_ratio(equity_curve, self.annualization_factor),
        }
    }
}

fn total_return(equity_curve: &[EquityPoint]) -> f64 {
    let (Some(first), Some(last)) = (equity_curve.first(), equity_curve.last()) else {
        return 0.0;
    };
    if first.equity == 0.0 {
        return 0.0;
    }
    let r = last.equity / first.equity - 1.0;
    if r.is_finite() { r } else { 0.0 }
}

fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        peak = peak.max(point.equity);
        if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

fn period_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            let prev = w[0].equity;
            let curr = w[1].equity;
            if prev != 0.0 {
                (curr - prev) / prev
            } else {
                0.0
            }
        })
        .collect()
}

fn sharpe_ratio(equity_curve: &[EquityPoint], annualization_factor: f64) -> f64 {
    let returns = period_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 && stddev.is_finite() {
        mean / stddev * annualization_factor.sqrt()
    } else {
        0.0
    }
}

/// Round-trip statistics from the trade log.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TradeStats {
    pub round_trips: usize,
    pub winning_trips: usize,
    pub losing_trips: usize,
    pub win_rate: f64,
    /// Net of fees on both legs.
    pub realized_pnl: f64,
    pub total_fees: f64,
}

impl TradeStats {
    /// Pairs each BUY with the next SELL. A trailing unmatched BUY is still
    /// open and only contributes its fee.
    pub fn compute(trades: &[Trade]) -> Self {
        let mut stats = TradeStats::default();
        let mut open: Option<&Trade> = None;

        for trade in trades {
            stats.total_fees += trade.fee;
            match trade.action {
                TradeAction::Buy => open = Some(trade),
                TradeAction::Sell => {
                    let Some(entry) = open.take() else {
                        continue;
                    };
                    let pnl = (trade.price - entry.price) * trade.quantity - entry.fee - trade.fee;
                    stats.round_trips += 1;
                    stats.realized_pnl += pnl;
                    if pnl > 0.0 {
                        stats.winning_trips += 1;
                    } else if pnl < 0.0 {
                        stats.losing_trips += 1;
                    }
                }
            }
        }

        if stats.round_trips > 0 {
            stats.win_rate = stats.winning_trips as f64 / stats.round_trips as f64;
        }
        stats
    }
}
