//! Crossover detection between two bar-aligned indicator arrays.

use crate::domain::indicator::IndicatorValue;

/// +1 where `a` crosses above `b`, -1 where it crosses below, else 0.
///
/// Bar 0 and any bar where either side is undefined at `i` or `i-1` yield 0.
/// `crossover(a, b)` is the pointwise negation of `crossover(b, a)`.
pub fn crossover(a: &[IndicatorValue], b: &[IndicatorValue]) -> Vec<i8> {
    let n = a.len().max(b.len());
    let mut out = vec![0i8; n];

    for i in 1..a.len().min(b.len()) {
        let (Some(a0), Some(a1), Some(b0), Some(b1)) =
            (a[i - 1].value(), a[i].value(), b[i - 1].value(), b[i].value())
        else {
            continue;
        };
        if a1 > b1 && a0 <= b0 {
            out[i] = 1;
        } else if a1 < b1 && a0 >= b0 {
            out[i] = -1;
        }
    }
    out
}
