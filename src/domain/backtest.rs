//! Backtest engine: long-only FLAT/LONG state machine over final signals.
//!
//! Bars are consumed once, in series order. A decision on bar `i` executes at
//! bar `i`'s close. Every bar appends exactly one equity point; an open
//! position at the end is marked to market, never force-closed.

use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, info};

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Series;
use crate::domain::portfolio::{EquityPoint, Ledger};
use crate::domain::position::Trade;

/// What to do with a BUY whose cost exceeds the current balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceCheckPolicy {
    /// Refuse the BUY; stay flat.
    Strict,
    /// Execute anyway; balance may go negative.
    Unchecked,
}

impl FromStr for BalanceCheckPolicy {
    type Err = SigtraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(BalanceCheckPolicy::Strict),
            "unchecked" => Ok(BalanceCheckPolicy::Unchecked),
            other => Err(SigtraderError::invalid_config(
                "balance_check",
                format!("expected 'strict' or 'unchecked', got '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    /// Units bought on entry.
    pub trade_size: f64,
    /// Fraction of notional charged on every trade.
    pub fee_rate: f64,
    pub balance_check: BalanceCheckPolicy,
}

impl BacktestConfig {
    pub fn new(balance_check: BalanceCheckPolicy) -> Self {
        Self {
            initial_balance: 10_000.0,
            trade_size: 0.01,
            fee_rate: 0.001,
            balance_check,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionState {
    Flat,
    Long,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    /// BUY decisions refused under `BalanceCheckPolicy::Strict`.
    pub rejected_buys: usize,
    pub final_state: PositionState,
}

pub struct BacktestSimulator {
    config: BacktestConfig,
}

impl BacktestSimulator {
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// Replays `final_signal` (one entry per bar) against a fresh ledger.
    pub fn run(
        &self,
        series: &Series,
        final_signal: &[i8],
    ) -> Result<BacktestResult, SigtraderError> {
        if final_signal.len() != series.len() {
            return Err(SigtraderError::SignalLengthMismatch {
                bars: series.len(),
                signals: final_signal.len(),
            });
        }

        let cfg = &self.config;
        let mut ledger = Ledger::new(cfg.initial_balance);
        let mut rejected_buys = 0usize;

        for (bar, &signal) in series.bars().iter().zip(final_signal) {
            let price = bar.close;
            match (position_state(&ledger), signal) {
                (PositionState::Flat, 1) => {
                    let cost = price * cfg.trade_size * (1.0 + cfg.fee_rate);
                    if cfg.balance_check == BalanceCheckPolicy::Strict && cost > ledger.balance {
                        rejected_buys += 1;
                        debug!(
                            timestamp = %bar.timestamp,
                            cost,
                            balance = ledger.balance,
                            "buy rejected: insufficient balance"
                        );
                    } else {
                        let trade =
                            ledger.open_long(bar.timestamp, price, cfg.trade_size, cfg.fee_rate);
                        debug!(
                            timestamp = %trade.timestamp,
                            price = trade.price,
                            balance = trade.resulting_balance,
                            "buy"
                        );
                    }
                }
                (PositionState::Long, -1) => {
                    if let Some(trade) = ledger.close_long(bar.timestamp, price, cfg.fee_rate) {
                        debug!(
                            timestamp = %trade.timestamp,
                            price = trade.price,
                            balance = trade.resulting_balance,
                            "sell"
                        );
                    }
                }
                _ => {}
            }
            ledger.record_equity(bar.timestamp, price);
        }

        info!(
            bars = series.len(),
            trades = ledger.trades.len(),
            rejected_buys,
            final_balance = ledger.balance,
            "backtest complete"
        );

        let final_state = position_state(&ledger);
        Ok(BacktestResult {
            trades: ledger.trades,
            equity_curve: ledger.equity_curve,
            rejected_buys,
            final_state,
        })
    }
}

fn position_state(ledger: &Ledger) -> PositionState {
    if ledger.has_position() {
        PositionState::Long
    } else {
        PositionState::Flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PriceBar;
    use crate::domain::position::TradeAction;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Series::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PriceBar {
                    timestamp: start + chrono::Duration::hours(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1.0,
                })
                .collect(),
        )
        .unwrap()
    }

    fn config(policy: BalanceCheckPolicy) -> BacktestConfig {
        BacktestConfig {
            initial_balance: 1_000.0,
            trade_size: 1.0,
            fee_rate: 0.0,
            balance_check: policy,
        }
    }

    #[test]
    fn buy_then_sell_round_trip() {
        let s = series(&[100.0, 100.0, 110.0, 90.0, 90.0]);
        let result = BacktestSimulator::new(config(BalanceCheckPolicy::Strict))
            .run(&s, &[0, 1, 0, -1, 0])
            .unwrap();

        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].action, TradeAction::Buy);
        assert_abs_diff_eq!(result.trades[0].price, 100.0);
        assert_abs_diff_eq!(result.trades[0].resulting_balance, 900.0);
        assert_eq!(result.trades[1].action, TradeAction::Sell);
        assert_abs_diff_eq!(result.trades[1].price, 90.0);
        assert_abs_diff_eq!(result.trades[1].resulting_balance, 990.0);

        let equity: Vec<f64> = result.equity_curve.iter().map(|p| p.equity).collect();
        assert_eq!(equity, vec![1_000.0, 1_000.0, 1_010.0, 990.0, 990.0]);
        assert_eq!(result.final_state, PositionState::Flat);
    }

    #[test]
    fn repeated_buys_while_long_are_held() {
        let s = series(&[100.0, 101.0, 102.0]);
        let result = BacktestSimulator::new(config(BalanceCheckPolicy::Strict))
            .run(&s, &[1, 1, 1])
            .unwrap();
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.final_state, PositionState::Long);
    }

    #[test]
    fn sell_while_flat_is_ignored() {
        let s = series(&[100.0, 101.0]);
        let result = BacktestSimulator::new(config(BalanceCheckPolicy::Strict))
            .run(&s, &[-1, -1])
            .unwrap();
        assert!(result.trades.is_empty());
        assert_abs_diff_eq!(result.equity_curve[1].equity, 1_000.0);
    }

    #[test]
    fn open_position_marked_not_closed() {
        let s = series(&[100.0, 150.0]);
        let result = BacktestSimulator::new(config(BalanceCheckPolicy::Strict))
            .run(&s, &[1, 0])
            .unwrap();
        assert_eq!(result.trades.len(), 1);
        assert_abs_diff_eq!(result.equity_curve[1].equity, 1_050.0);
        assert_eq!(result.final_state, PositionState::Long);
    }

    #[test]
    fn fees_applied_both_ways() {
        let s = series(&[100.0, 100.0]);
        let cfg = BacktestConfig {
            fee_rate: 0.01,
            ..config(BalanceCheckPolicy::Strict)
        };
        let result = BacktestSimulator::new(cfg).run(&s, &[1, -1]).unwrap();
        assert_abs_diff_eq!(result.trades[0].resulting_balance, 899.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.trades[1].resulting_balance, 998.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.trades[1].fee, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn strict_rejects_unaffordable_buy() {
        let s = series(&[2_000.0, 2_100.0]);
        let result = BacktestSimulator::new(config(BalanceCheckPolicy::Strict))
            .run(&s, &[1, -1])
            .unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.rejected_buys, 1);
        assert_eq!(result.final_state, PositionState::Flat);
        assert_abs_diff_eq!(result.equity_curve[1].equity, 1_000.0);
    }

    #[test]
    fn rejected_buy_leaves_later_signals_flat() {
        let s = series(&[2_000.0, 500.0, 600.0, 700.0]);
        let result = BacktestSimulator::new(config(BalanceCheckPolicy::Strict))
            .run(&s, &[1, -1, 1, -1])
            .unwrap();
        assert_eq!(result.rejected_buys, 1);
        let actions: Vec<TradeAction> = result.trades.iter().map(|t| t.action).collect();
        assert_eq!(actions, vec![TradeAction::Buy, TradeAction::Sell]);
        assert_abs_diff_eq!(result.trades[0].price, 600.0);
        assert_eq!(result.final_state, PositionState::Flat);
    }

    #[test]
    fn position_state_follows_ledger() {
        let mut ledger = Ledger::new(1_000.0);
        assert_eq!(position_state(&ledger), PositionState::Flat);
        let ts = series(&[100.0]).bars()[0].timestamp;
        ledger.open_long(ts, 100.0, 1.0, 0.0);
        assert_eq!(position_state(&ledger), PositionState::Long);
        ledger.close_long(ts, 100.0, 0.0);
        assert_eq!(position_state(&ledger), PositionState::Flat);
    }

    #[test]
    fn strict_allows_exactly_affordable_buy() {
        let s = series(&[1_000.0]);
        let result = BacktestSimulator::new(config(BalanceCheckPolicy::Strict))
            .run(&s, &[1])
            .unwrap();
        assert_eq!(result.trades.len(), 1);
        assert_abs_diff_eq!(result.trades[0].resulting_balance, 0.0);
    }

    #[test]
    fn unchecked_allows_negative_balance() {
        let s = series(&[2_000.0, 2_100.0]);
        let result = BacktestSimulator::new(config(BalanceCheckPolicy::Unchecked))
            .run(&s, &[1, 0])
            .unwrap();
        assert_eq!(result.trades.len(), 1);
        assert_abs_diff_eq!(result.trades[0].resulting_balance, -1_000.0);
        assert_abs_diff_eq!(result.equity_curve[1].equity, 1_100.0);
        assert_eq!(result.rejected_buys, 0);
    }

    #[test]
    fn signal_length_mismatch_is_error() {
        let s = series(&[1.0, 2.0]);
        let err = BacktestSimulator::new(config(BalanceCheckPolicy::Strict))
            .run(&s, &[0])
            .unwrap_err();
        assert!(matches!(
            err,
            SigtraderError::SignalLengthMismatch {
                bars: 2,
                signals: 1
            }
        ));
    }

    #[test]
    fn empty_series() {
        let result = BacktestSimulator::new(config(BalanceCheckPolicy::Strict))
            .run(&Series::default(), &[])
            .unwrap();
        assert!(result.trades.is_empty());
        assert!(result.equity_curve.is_empty());
    }

    #[test]
    fn policy_parsing() {
        assert_eq!(
            "Strict".parse::<BalanceCheckPolicy>().unwrap(),
            BalanceCheckPolicy::Strict
        );
        assert_eq!(
            "unchecked".parse::<BalanceCheckPolicy>().unwrap(),
            BalanceCheckPolicy::Unchecked
        );
        assert!("lenient".parse::<BalanceCheckPolicy>().is_err());
    }
}
