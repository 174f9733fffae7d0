//! chartscript core: turns indicator scripts plus a candle history into
//! chart overlays and trade markers.
//!
//! - Domain types (candles, line series, indicator results, markers)
//! - Script classification and the generic line parser
//! - Classical indicators: SMA, windowed/continuous EMA, RSI, MACD, Bollinger
//! - Signal models: per-bar logistic regression, regression + EMA, bull/bear power
//! - The overlay orchestrator that routes each script to one calculator
//!
//! Everything here is synchronous and pure; no function keeps state between calls.

pub mod domain;
pub mod fingerprint;
pub mod indicators;
pub mod ml;
pub mod overlay;
pub mod script;

pub use overlay::{compute_overlays, OverlaySet};
