//! Simple Moving Average (SMA).
//!
//! Trailing mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use super::window::sum;
use super::Indicator;
use crate::domain::{closes, Candle};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        sma_of_series(&closes(candles), self.period)
    }
}

/// SMA over a raw slice. Each window is summed fresh rather than rolled, so
/// values carry no accumulated floating-point drift.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        result[i] = sum(&values[i + 1 - period..=i]) / period as f64;
    }

    result
}
