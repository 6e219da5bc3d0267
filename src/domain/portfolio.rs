//! Balance/position ledger and equity tracking.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::position::{Position, Trade, TradeAction};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

/// Mutable state of one backtest run. Trades and equity points are
/// append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub balance: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Ledger {
    pub fn new(initial_balance: f64) -> Self {
        Ledger {
            balance: initial_balance,
            position: None,
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    /// Balance plus the open position marked at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        let position_value = self
            .position
            .as_ref()
            .map(|p| p.market_value(price))
            .unwrap_or(0.0);
        self.balance + position_value
    }

    pub fn open_long(
        &mut self,
        timestamp: NaiveDateTime,
        price: f64,
        quantity: f64,
        fee_rate: f64,
    ) -> &Trade {
        let fee = price * quantity * fee_rate;
        self.balance -= price * quantity * (1.0 + fee_rate);
        self.position = Some(Position {
            quantity,
            entry_price: price,
        });
        self.push_trade(timestamp, TradeAction::Buy, price, quantity, fee)
    }

    /// Liquidates the open position; `None` when flat.
    pub fn close_long(
        &mut self,
        timestamp: NaiveDateTime,
        price: f64,
        fee_rate: f64,
    ) -> Option<&Trade> {
        let position = self.position.take()?;
        let quantity = position.quantity;
        let fee = price * quantity * fee_rate;
        self.balance += price * quantity * (1.0 - fee_rate);
        Some(self.push_trade(timestamp, TradeAction::Sell, price, quantity, fee))
    }

    pub fn record_equity(&mut self, timestamp: NaiveDateTime, price: f64) {
        let equity = self.equity(price);
        self.equity_curve.push(EquityPoint { timestamp, equity });
    }

    fn push_trade(
        &mut self,
        timestamp: NaiveDateTime,
        action: TradeAction,
        price: f64,
        quantity: f64,
        fee: f64,
    ) -> &Trade {
        self.trades.push(Trade {
            timestamp,
            action,
            price,
            quantity,
            fee,
            resulting_balance: self.balance,
        });
        &self.trades[self.trades.len() - 1]
    }
}
