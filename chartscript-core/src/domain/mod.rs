//! Domain types for chartscript

pub mod candle;
pub mod marker;
pub mod series;

pub use candle::{closes, validate_candles, Candle, CandleError};
pub use marker::{Marker, MarkerKind};
pub use series::{IndicatorResult, LineSeries, LineStyle, ResultKind, SeriesPoint};
