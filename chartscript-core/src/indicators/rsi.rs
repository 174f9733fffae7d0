//! Relative Strength Index (RSI).
//!
//! Seed at index `period`: plain mean of the first `period` gains and losses.
//! After that, the "previous" averages are not carried forward. They are
//! recomputed as plain means over every delta before the current one, then
//! blended: `avg = (prev_avg * (period - 1) + delta) / period`.
//! This is not Wilder smoothing; charts built on it depend on the exact values.
//!
//! RS is pinned to 100 when the average loss is zero, so an all-gains window
//! reads ~99.01, never 100.
//! Lookback: period.

use super::window::sum;
use super::Indicator;
use crate::domain::{closes, Candle};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        rsi_of_series(&closes(candles), self.period)
    }
}

pub fn rsi_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n <= period {
        return result;
    }

    // gains[j] / losses[j] hold the move from values[j] to values[j + 1].
    let mut gains = Vec::with_capacity(n - 1);
    let mut losses = Vec::with_capacity(n - 1);
    for pair in values.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let p = period as f64;
    result[period] = compute_rsi(
        sum(&gains[..period]) / p,
        sum(&losses[..period]) / p,
    );

    // Running prefix sums over gains[..i-1]; accumulating left to right from
    // zero gives the same bits as re-summing the prefix every bar.
    let mut gain_prefix = sum(&gains[..period - 1]);
    let mut loss_prefix = sum(&losses[..period - 1]);
    for i in (period + 1)..n {
        gain_prefix += gains[i - 2];
        loss_prefix += losses[i - 2];
        let count = (i - 1) as f64;

        let avg_gain = (gain_prefix / count * (p - 1.0) + gains[i - 1]) / p;
        let avg_loss = (loss_prefix / count * (p - 1.0) + losses[i - 1]) / p;
        result[i] = compute_rsi(avg_gain, avg_loss);
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        100.0
    } else {
        avg_gain / avg_loss
    };
    100.0 - 100.0 / (1.0 + rs)
}
