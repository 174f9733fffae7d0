//! Candle: the fundamental market data unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One time-bucketed OHLC(V) observation.
///
/// `time` is in epoch seconds. A candle history is sorted ascending by
/// `time` with no two candles sharing a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Returns true if every OHLC field is finite.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }

    /// Basic OHLC sanity check: high bounds open/close from above, low from below.
    pub fn is_sane(&self) -> bool {
        self.is_finite()
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Violations of the candle-history ordering contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandleError {
    #[error("candle {index} at t={time} is earlier than its predecessor")]
    Unsorted { index: usize, time: i64 },

    #[error("candle {index} duplicates timestamp t={time}")]
    DuplicateTime { index: usize, time: i64 },

    #[error("candle {index} at t={time} has a non-finite OHLC field")]
    NonFinite { index: usize, time: i64 },
}

/// Check that a history is strictly increasing in time with finite prices.
pub fn validate_candles(candles: &[Candle]) -> Result<(), CandleError> {
    for (index, candle) in candles.iter().enumerate() {
        if !candle.is_finite() {
            return Err(CandleError::NonFinite {
                index,
                time: candle.time,
            });
        }
        if index == 0 {
            continue;
        }
        let prev = candles[index - 1].time;
        if candle.time == prev {
            return Err(CandleError::DuplicateTime {
                index,
                time: candle.time,
            });
        }
        if candle.time < prev {
            return Err(CandleError::Unsorted {
                index,
                time: candle.time,
            });
        }
    }
    Ok(())
}

/// Close prices aligned by index to the candle sequence.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Candle> {
        vec![
            Candle::new(100, 10.0, 12.0, 9.0, 11.0),
            Candle::new(200, 11.0, 13.0, 10.0, 12.0),
            Candle::new(300, 12.0, 14.0, 11.0, 13.0),
        ]
    }

    #[test]
    fn ordered_history_validates() {
        assert_eq!(validate_candles(&sample()), Ok(()));
        assert_eq!(validate_candles(&[]), Ok(()));
    }

    #[test]
    fn duplicate_time_rejected() {
        let mut candles = sample();
        candles[2].time = 200;
        assert_eq!(
            validate_candles(&candles),
            Err(CandleError::DuplicateTime { index: 2, time: 200 })
        );
    }

    #[test]
    fn unsorted_rejected() {
        let mut candles = sample();
        candles[1].time = 50;
        assert!(matches!(
            validate_candles(&candles),
            Err(CandleError::Unsorted { index: 1, .. })
        ));
    }

    #[test]
    fn nan_close_rejected() {
        let mut candles = sample();
        candles[0].close = f64::NAN;
        assert!(matches!(
            validate_candles(&candles),
            Err(CandleError::NonFinite { index: 0, .. })
        ));
        assert!(!candles[0].is_sane());
    }

    #[test]
    fn volume_is_optional_in_json() {
        let candle: Candle =
            serde_json::from_str(r#"{"time":1,"open":1.0,"high":2.0,"low":0.5,"close":1.5}"#)
                .unwrap();
        assert_eq!(candle.volume, None);
        let json = serde_json::to_string(&candle).unwrap();
        assert!(!json.contains("volume"));
    }
}
