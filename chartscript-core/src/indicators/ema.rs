//! Exponential Moving Average (EMA), in two deliberately distinct variants.
//!
//! - Windowed ([`Ema`], [`ema_of_series`]): undefined before `period-1`,
//!   seeded there by the SMA of the first `period` values, then
//!   `v[i] = (x[i] - v[i-1]) * k + v[i-1]`. Used by the generic EMA line and MACD.
//! - Continuous ([`ContinuousEma`], [`continuous_ema_of_series`]): defined
//!   everywhere, `v[0] = x[0]`, then `v[i] = x[i] * k + v[i-1] * (1 - k)`.
//!   Used by the regression + EMA engine.
//!
//! Both use `k = 2 / (period + 1)`. The two recurrences are algebraically equal
//! but round differently; each call site keeps its own form.

use super::window::sum;
use super::Indicator;
use crate::domain::{closes, Candle};

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        ema_of_series(&closes(candles), self.period)
    }
}

/// Windowed EMA over a raw slice.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);

    let mut prev = sum(&values[..period]) / period as f64;
    result[period - 1] = prev;

    for i in period..n {
        prev = (values[i] - prev) * k + prev;
        result[i] = prev;
    }

    result
}

#[derive(Debug, Clone)]
pub struct ContinuousEma {
    period: usize,
    name: String,
}

impl ContinuousEma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("cema_{period}"),
        }
    }
}

impl Indicator for ContinuousEma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        continuous_ema_of_series(&closes(candles), self.period)
    }
}

/// Continuous EMA over a raw slice; defined at every index.
pub fn continuous_ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    result.push(first);

    for &x in &values[1..] {
        let prev = result[result.len() - 1];
        result.push(x * k + prev * (1.0 - k));
    }

    result
}
