//! Candle sources and payload shape recognition.
//!
//! A [`CandleSource`] returns a raw JSON payload; [`recognize_candles`] decides
//! whether that payload is candle data. Two shapes are accepted:
//! - a non-empty array whose first element has an `open` field
//! - an object with a `data` array
//!
//! Row fields: `open|o`, `high|h`, `low|l`, `close|c` (numbers or numeric
//! strings), optional `volume|v`, and a time taken from a numeric `time`, or
//! from a `time` / `date` / `timestamp` string (RFC 3339 or `YYYY-MM-DD`).

use std::path::PathBuf;

use chartscript_core::domain::Candle;
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from fetching a raw payload.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Why a payload was not recognised as candle data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("payload is neither a candle array nor an object with a `data` array")]
    Unrecognized,

    #[error("payload contains no candles")]
    Empty,

    #[error("row {index}: missing or non-numeric `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("row {index}: missing or unparsable time")]
    BadTime { index: usize },
}

/// Chart timeframes offered to users, in display order.
pub const TIMEFRAMES: [&str; 8] = ["1m", "5m", "15m", "1h", "4h", "D", "W", "M"];

/// Default number of bars requested from a provider.
pub const DEFAULT_RANGE: u32 = 300;

/// What to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub symbol: String,
    pub timeframe: String,
    pub range: u32,
}

impl FetchRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: "D".into(),
            range: DEFAULT_RANGE,
        }
    }

    /// Exchange-qualified symbol; bare tickers get the `IDX:` prefix.
    pub fn market_symbol(&self) -> String {
        if self.symbol.contains(':') {
            self.symbol.clone()
        } else {
            format!("IDX:{}", self.symbol)
        }
    }

    /// Provider timeframe code: intraday labels map to minutes, others pass through.
    pub fn provider_timeframe(&self) -> &str {
        match self.timeframe.as_str() {
            "1m" => "1",
            "5m" => "5",
            "15m" => "15",
            "1h" => "60",
            "4h" => "240",
            other => other,
        }
    }
}

/// Trait for candle providers.
///
/// Implementations only fetch; shape recognition and fallback sit above this trait.
pub trait CandleSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the raw payload for a request.
    fn fetch(&self, request: &FetchRequest) -> Result<Value, SourceError>;
}

/// Reads payloads from disk.
///
/// If the root is a directory, `<root>/<SYMBOL>.json` is read; otherwise the
/// root file is returned for every symbol.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    root: PathBuf,
}

impl JsonFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        if self.root.is_dir() {
            self.root.join(format!("{symbol}.json"))
        } else {
            self.root.clone()
        }
    }
}

impl CandleSource for JsonFileSource {
    fn name(&self) -> &str {
        "json_file"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Value, SourceError> {
        let path = self.path_for(&request.symbol);
        if self.root.is_dir() && !path.exists() {
            return Err(SourceError::SymbolNotFound {
                symbol: request.symbol.clone(),
            });
        }
        let text = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SourceError::Json { path, source })
    }
}

/// Recognise and canonicalise a candle payload.
///
/// Output is sorted by time; rows sharing a time keep the last one.
pub fn recognize_candles(payload: &Value) -> Result<Vec<Candle>, ShapeError> {
    let rows = match payload {
        Value::Array(rows) if rows.first().is_some_and(|r| r.get("open").is_some()) => rows,
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Array(rows)) => rows,
            _ => return Err(ShapeError::Unrecognized),
        },
        _ => return Err(ShapeError::Unrecognized),
    };

    let mut candles = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let Some(row) = row.as_object() else {
            return Err(ShapeError::MissingField {
                index,
                field: "open",
            });
        };
        candles.push(parse_row(index, row)?);
    }

    if candles.is_empty() {
        return Err(ShapeError::Empty);
    }
    Ok(canonicalize(candles))
}

/// Sort by time and drop earlier duplicates.
pub fn canonicalize(mut candles: Vec<Candle>) -> Vec<Candle> {
    // Stable sort keeps input order among equal times, so the last one wins below.
    candles.sort_by_key(|c| c.time);
    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        match out.last_mut() {
            Some(last) if last.time == candle.time => *last = candle,
            _ => out.push(candle),
        }
    }
    out
}

// ── Row parsing ──────────────────────────────────────────────────────

fn parse_row(index: usize, row: &Map<String, Value>) -> Result<Candle, ShapeError> {
    let field = |names: &[&str], field: &'static str| {
        names
            .iter()
            .find_map(|n| row.get(*n).and_then(number))
            .ok_or(ShapeError::MissingField { index, field })
    };

    let open = field(&["open", "o"], "open")?;
    let high = field(&["high", "h"], "high")?;
    let low = field(&["low", "l"], "low")?;
    let close = field(&["close", "c"], "close")?;
    let volume = ["volume", "v"]
        .iter()
        .find_map(|n| row.get(*n).and_then(number));
    let time = row_time(row).ok_or(ShapeError::BadTime { index })?;

    Ok(Candle {
        time,
        open,
        high,
        low,
        close,
        volume,
    })
}

fn number(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    v.filter(|v| v.is_finite())
}

fn row_time(row: &Map<String, Value>) -> Option<i64> {
    if let Some(Value::Number(n)) = row.get("time") {
        return n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64));
    }
    ["time", "date", "timestamp"]
        .iter()
        .find_map(|key| row.get(*key).and_then(Value::as_str))
        .and_then(parse_time_string)
}

/// Seconds since epoch for an RFC 3339 timestamp or a `YYYY-MM-DD` date (UTC midnight).
pub fn parse_time_string(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}
