//! Input fingerprinting: a stable content hash of (candles, scripts).
//!
//! Two overlay computations with equal fingerprints are guaranteed to produce
//! equal output, which is what lets callers detect stale results.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Candle;

/// BLAKE3 hex digest of one overlay input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFingerprint(pub String);

impl InputFingerprint {
    /// Hash candles (all OHLCV fields, little-endian) followed by scripts.
    ///
    /// Every variable-length part is length-prefixed so that moving text
    /// between scripts changes the hash.
    pub fn compute<S: AsRef<str>>(candles: &[Candle], scripts: &[S]) -> Self {
        let mut hasher = blake3::Hasher::new();

        hasher.update(&(candles.len() as u64).to_le_bytes());
        for c in candles {
            hasher.update(&c.time.to_le_bytes());
            for v in [c.open, c.high, c.low, c.close] {
                hasher.update(&v.to_le_bytes());
            }
            match c.volume {
                Some(v) => {
                    hasher.update(&[1]);
                    hasher.update(&v.to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }

        hasher.update(&(scripts.len() as u64).to_le_bytes());
        for script in scripts {
            let bytes = script.as_ref().as_bytes();
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }

        Self(hasher.finalize().to_hex().to_string())
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for InputFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles() -> Vec<Candle> {
        vec![
            Candle::new(1, 10.0, 11.0, 9.0, 10.5),
            Candle::new(2, 10.5, 12.0, 10.0, 11.5),
        ]
    }

    #[test]
    fn hashing_is_deterministic() {
        let a = InputFingerprint::compute(&candles(), &["sma 20"]);
        let b = InputFingerprint::compute(&candles(), &["sma 20"]);
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 64);
        assert_eq!(a.short().len(), 12);
    }

    #[test]
    fn script_boundaries_matter() {
        let a = InputFingerprint::compute(&candles(), &["sma 2", "0"]);
        let b = InputFingerprint::compute(&candles(), &["sma 20"]);
        assert_ne!(a, b);
    }

    #[test]
    fn candle_changes_are_detected() {
        let mut changed = candles();
        changed[1].close = 11.6;
        let scripts: [&str; 0] = [];
        assert_ne!(
            InputFingerprint::compute(&candles(), &scripts),
            InputFingerprint::compute(&changed, &scripts)
        );
        changed[1].close = 11.5;
        changed[1].volume = Some(0.0);
        assert_ne!(
            InputFingerprint::compute(&candles(), &scripts),
            InputFingerprint::compute(&changed, &scripts)
        );
    }
}
