//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::sma::sma_of_series;
use super::window::sum;
use super::Indicator;
use crate::domain::{closes, Candle};

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

/// All three bands, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Upper, "upper")
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Middle, "middle")
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Lower, "lower")
    }

    fn build(period: usize, multiplier: f64, band: BollingerBand, label: &str) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let bands = bands_of_series(&closes(candles), self.period, self.multiplier);
        match self.band {
            BollingerBand::Upper => bands.upper,
            BollingerBand::Middle => bands.middle,
            BollingerBand::Lower => bands.lower,
        }
    }
}

/// Population standard deviation of each trailing window, fresh mean per window.
fn stdev_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        let mean = sum(window) / period as f64;
        let variance = window
            .iter()
            .fold(0.0, |acc, v| acc + (v - mean) * (v - mean))
            / period as f64;
        result[i] = variance.sqrt();
    }

    result
}

pub fn bands_of_series(values: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let middle = sma_of_series(values, period);
    let sd = stdev_of_series(values, period);

    let upper = middle.iter().zip(&sd).map(|(m, s)| m + s * multiplier).collect();
    let lower = middle.iter().zip(&sd).map(|(m, s)| m - s * multiplier).collect();

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn bollinger_middle_is_sma() {
        let candles = make_candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Bollinger::middle(3, 2.0).compute(&candles);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_width_is_two_mult_stdev() {
        // window (10, 11, 12): population stdev = sqrt(2/3)
        let bands = bands_of_series(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, 2.0);
        let sd = (2.0_f64 / 3.0).sqrt();
        for i in 2..5 {
            assert_approx(bands.upper[i] - bands.lower[i], 4.0 * sd, 1e-9);
            assert_approx(
                bands.upper[i] - bands.middle[i],
                bands.middle[i] - bands.lower[i],
                1e-9,
            );
        }
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let candles = make_candles(&[100.0, 100.0, 100.0, 100.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&candles);
        let lower = Bollinger::lower(3, 2.0).compute(&candles);
        assert_approx(upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(lower[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
    }
}
