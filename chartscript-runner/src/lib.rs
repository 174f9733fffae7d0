//! chartscript runner: everything around the pure overlay engine.
//!
//! This crate builds on `chartscript-core` to provide:
//! - Candle sources and payload recognition
//! - Loading with a synthetic placeholder fallback
//! - TOML chart configuration
//! - A recompute session that never publishes stale overlays
//! - JSON / CSV export

pub mod candle_source;
pub mod config;
pub mod export;
pub mod loader;
pub mod session;
pub mod synthetic;

pub use candle_source::{
    recognize_candles, CandleSource, FetchRequest, JsonFileSource, ShapeError, SourceError,
};
pub use config::{ChartConfig, ConfigError, SyntheticSettings};
pub use export::{export_json, import_json, load_artifacts, save_artifacts, ExportDocument};
pub use loader::{load_candles, load_candles_at, DataSource, LoadError, LoadedCandles};
pub use session::{CommitError, OverlaySession, RecomputeJob, RecomputeTicket};
pub use synthetic::generate_synthetic_candles;
