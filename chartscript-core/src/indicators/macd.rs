//! Moving Average Convergence/Divergence.
//!
//! MACD line = windowed EMA(fast) - windowed EMA(slow), defined where both are.
//! Signal line = windowed EMA(signal) over the compacted (defined-only) MACD
//! values, shifted right so it starts at the MACD line's first defined index.

use super::ema::ema_of_series;
use super::Indicator;
use crate::domain::{closes, Candle};

/// Both MACD outputs, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

pub fn macd_of_series(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdLines {
    let n = values.len();
    let fast_ema = ema_of_series(values, fast);
    let slow_ema = ema_of_series(values, slow);

    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| if f.is_nan() || s.is_nan() { f64::NAN } else { f - s })
        .collect();

    let mut padded = vec![f64::NAN; n];
    if let Some(offset) = macd.iter().position(|v| !v.is_nan()) {
        let compact: Vec<f64> = macd.iter().copied().filter(|v| !v.is_nan()).collect();
        for (j, v) in ema_of_series(&compact, signal).into_iter().enumerate() {
            if offset + j < n {
                padded[offset + j] = v;
            }
        }
    }

    MacdLines {
        macd,
        signal: padded,
    }
}

/// Which MACD output an [`Indicator`] instance exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdOutput {
    Line,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    output: MacdOutput,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdOutput::Line)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdOutput::Signal)
    }

    fn build(fast: usize, slow: usize, signal: usize, output: MacdOutput) -> Self {
        assert!(
            fast >= 1 && slow >= 1 && signal >= 1,
            "MACD periods must be >= 1"
        );
        let prefix = match output {
            MacdOutput::Line => "macd",
            MacdOutput::Signal => "macd_signal",
        };
        Self {
            fast,
            slow,
            signal,
            output,
            name: format!("{prefix}_{fast}_{slow}_{signal}"),
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let line = self.fast.max(self.slow) - 1;
        match self.output {
            MacdOutput::Line => line,
            MacdOutput::Signal => line.saturating_add(self.signal - 1),
        }
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let lines = macd_of_series(&closes(candles), self.fast, self.slow, self.signal);
        match self.output {
            MacdOutput::Line => lines.macd,
            MacdOutput::Signal => lines.signal,
        }
    }
}
