//! Fixed-size rolling window.
//!
//! Statistics are taken from the buffered values on every call, so a result
//! depends only on the current window and never on values already evicted.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    buf: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buf: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.buf.len() == self.capacity
    }

    /// Mean over a full window.
    pub fn mean(&self) -> Option<f64> {
        self.is_full().then(|| self.window_mean())
    }

    /// Sample variance (ddof = 1) over a full window of at least two values.
    pub fn sample_variance(&self) -> Option<f64> {
        if !self.is_full() || self.capacity < 2 {
            return None;
        }
        let mean = self.window_mean();
        let sum_sq: f64 = self.buf.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some(sum_sq / (self.capacity as f64 - 1.0))
    }

    pub fn sample_stddev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    // A flat window returns its value as-is; summing it could round away
    // from the value and leave a residue in the deviations.
    fn window_mean(&self) -> f64 {
        match self.buf.front() {
            Some(&first) if self.buf.iter().all(|&v| v == first) => first,
            Some(_) => self.buf.iter().sum::<f64>() / self.buf.len() as f64,
            None => 0.0,
        }
    }
}
