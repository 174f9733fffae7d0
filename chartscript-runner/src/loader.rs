//! Candle loading with placeholder fallback.
//!
//! A chart always gets candles: when the source is missing, fails, or returns
//! an unrecognised payload, a synthetic walk is substituted and the result is
//! flagged as a placeholder so callers can say so.

use chartscript_core::domain::Candle;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::candle_source::{recognize_candles, CandleSource, FetchRequest, ShapeError, SourceError};
use crate::config::SyntheticSettings;
use crate::synthetic::generate_synthetic_candles;

/// Why real candles could not be used. Never returned to callers; it becomes
/// the placeholder's `fallback_reason`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no candle source configured")]
    NoSource,

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("{source_name}: {shape}")]
    Shape {
        source_name: String,
        #[source]
        shape: ShapeError,
    },
}

/// Where a loaded series came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Real history from the named source.
    Provider(String),
    Synthetic,
}

/// Candles plus their provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCandles {
    pub symbol: String,
    pub candles: Vec<Candle>,
    pub source: DataSource,
    /// True when the candles are synthetic and must not be read as market data.
    pub placeholder: bool,
    /// Why the real source was not used, if it wasn't.
    pub fallback_reason: Option<String>,
}

/// Load candles for `request`, falling back to synthetic data at the current time.
pub fn load_candles(
    source: Option<&dyn CandleSource>,
    request: &FetchRequest,
    settings: &SyntheticSettings,
) -> LoadedCandles {
    load_candles_at(source, request, settings, chrono::Utc::now().timestamp())
}

/// [`load_candles`] with an explicit clock for the synthetic walk.
pub fn load_candles_at(
    source: Option<&dyn CandleSource>,
    request: &FetchRequest,
    settings: &SyntheticSettings,
    now: i64,
) -> LoadedCandles {
    let error = match source {
        None => LoadError::NoSource,
        Some(source) => match fetch_recognized(source, request) {
            Ok(candles) => {
                info!(
                    symbol = %request.symbol,
                    source = source.name(),
                    bars = candles.len(),
                    "loaded candles"
                );
                return LoadedCandles {
                    symbol: request.symbol.clone(),
                    candles,
                    source: DataSource::Provider(source.name().to_string()),
                    placeholder: false,
                    fallback_reason: None,
                };
            }
            Err(error) => error,
        },
    };

    warn!(symbol = %request.symbol, reason = %error, "using synthetic placeholder candles");
    LoadedCandles {
        symbol: request.symbol.clone(),
        candles: generate_synthetic_candles(&request.symbol, settings, now),
        source: DataSource::Synthetic,
        placeholder: true,
        fallback_reason: Some(error.to_string()),
    }
}

fn fetch_recognized(source: &dyn CandleSource, request: &FetchRequest) -> Result<Vec<Candle>, LoadError> {
    let payload = source.fetch(request)?;
    recognize_candles(&payload).map_err(|shape| LoadError::Shape {
        source_name: source.name().to_string(),
        shape,
    })
}
