//! Typed description of one generic indicator line.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bb,
}

/// One recognised indicator, in script line order.
///
/// Uses `BTreeMap` so params serialize in a stable key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDescriptor {
    pub name: String,
    pub kind: IndicatorKind,
    pub params: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl IndicatorDescriptor {
    pub fn new(name: impl Into<String>, kind: IndicatorKind, params: &[(&str, f64)]) -> Self {
        Self {
            name: name.into(),
            kind,
            params: params.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    /// Named numeric parameter, falling back to `default`.
    pub fn param(&self, name: &str, default: f64) -> f64 {
        self.params.get(name).copied().unwrap_or(default)
    }

    /// Named integer parameter, falling back to `default`.
    pub fn param_usize(&self, name: &str, default: usize) -> usize {
        self.params
            .get(name)
            .copied()
            .map(|v| v as usize)
            .unwrap_or(default)
    }
}
