//! Trade markers: discrete time-stamped signal annotations.

use serde::{Deserialize, Serialize};

/// What a marker denotes. Serialized as `buy`, `sell`, `stopBuy`, `stopSell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    /// Enter long.
    Buy,
    /// Enter short.
    Sell,
    /// Exit long.
    StopBuy,
    /// Exit short.
    StopSell,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Buy => "buy",
            MarkerKind::Sell => "sell",
            MarkerKind::StopBuy => "stopBuy",
            MarkerKind::StopSell => "stopSell",
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, MarkerKind::Buy | MarkerKind::Sell)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub time: i64,
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub price: f64,
}
