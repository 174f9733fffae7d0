//! Classical indicator calculators.
//!
//! Every indicator implements [`Indicator`]: the full candle history in, a
//! close-aligned `Vec<f64>` out, `NaN` wherever the value is undefined. The
//! `*_of_series` free functions run the same arithmetic on raw slices so that
//! composed indicators (MACD's signal line, the ML engines) can reuse them.
//!
//! Summation order is part of the output contract: window sums are taken
//! fresh, left to right, starting from `0.0`.

pub mod bollinger;
pub mod calculate;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod window;

pub use bollinger::{bands_of_series, Bollinger, BollingerBand, BollingerBands};
pub use calculate::{calculate, ColorCursor, DEFAULT_COLORS};
pub use ema::{continuous_ema_of_series, ema_of_series, ContinuousEma, Ema};
pub use macd::{macd_of_series, Macd, MacdLines};
pub use rsi::{rsi_of_series, Rsi};
pub use sma::{sma_of_series, Sma};

use crate::domain::Candle;

/// Trait for close-price indicators.
///
/// # Look-ahead contamination guard
/// No value at index t may depend on a candle after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading indices that are always undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the entire history.
    ///
    /// Returns a `Vec<f64>` of the same length as `candles`.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;
}

/// Create candles from close prices for testing.
///
/// open = previous close, high/low = max/min(open, close) +/- 1, one-minute spacing.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle::new(
                1_700_000_000 + i as i64 * 60,
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
