//! Rolling least-squares regression line with a continuous EMA companion.

use serde::{Deserialize, Serialize};

use crate::domain::{closes, Candle, IndicatorResult, LineSeries, ResultKind, SeriesPoint};
use crate::indicators::{ContinuousEma, Indicator};
use crate::indicators::window::{correlation, mean, stdev};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionParams {
    pub regression_length: usize,
    pub ema_length: usize,
}

impl Default for RegressionParams {
    fn default() -> Self {
        Self {
            regression_length: 14,
            ema_length: 20,
        }
    }
}

/// Fitted value at `end` of the regression of `prices` on bar index.
///
/// `slope = corr * sd(price) / sd(index)`; a zero index deviation falls back
/// to the window's mean price.
pub fn fitted_value(index: &[f64], prices: &[f64], end: usize, length: usize) -> f64 {
    let x_mean = mean(index, end, length);
    let y_mean = mean(prices, end, length);
    let sd_x = stdev(index, end, length);
    let sd_y = stdev(prices, end, length);
    let corr = correlation(index, prices, end, length);

    if sd_x == 0.0 {
        return y_mean;
    }
    let slope = corr * (sd_y / sd_x);
    let intercept = y_mean - slope * x_mean;
    index[end] * slope + intercept
}

/// Returns `None` when fewer than `regression_length + 5` candles are available.
pub fn compute_regression(candles: &[Candle], params: &RegressionParams) -> Option<IndicatorResult> {
    let n = candles.len();
    if n < params.regression_length.saturating_add(5) {
        return None;
    }
    let length = params.regression_length.max(1);

    let prices = closes(candles);
    let index: Vec<f64> = (0..n).map(|i| i as f64).collect();

    let regression: Vec<SeriesPoint> = (length - 1..n)
        .map(|i| SeriesPoint {
            time: candles[i].time,
            value: fitted_value(&index, &prices, i, length),
        })
        .collect();

    // A zero length is computed as 1, which tracks the close exactly.
    let ema = ContinuousEma::new(params.ema_length.max(1)).compute(candles);
    let ema_points: Vec<SeriesPoint> = (params.ema_length.saturating_sub(1)..n)
        .map(|i| SeriesPoint {
            time: candles[i].time,
            value: ema[i],
        })
        .collect();

    Some(IndicatorResult {
        name: "ML2 Linear Regression + EMA".into(),
        kind: ResultKind::Line,
        lines: vec![
            LineSeries::new("Linear Regression", "#FF0000", 2).with_points(regression),
            LineSeries::new(format!("EMA {}", params.ema_length), "#2196F3", 2)
                .with_points(ema_points),
        ],
    })
}
