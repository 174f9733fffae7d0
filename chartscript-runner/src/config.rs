//! TOML chart configuration.
//!
//! ```toml
//! scripts = ["ta.sma(close, 20)"]
//! templates = ["RSI 14", "ML Logistic Regression"]
//!
//! [chart]
//! symbol = "BBCA"
//! timeframe = "D"
//! range = 300
//!
//! [synthetic]
//! bar_count = 200
//! seed = 7
//!
//! [synthetic.base_prices]
//! XYZ = 1200.0
//! ```
//!
//! Every field is optional; missing sections take their defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chartscript_core::script::find_template;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::candle_source::{FetchRequest, DEFAULT_RANGE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown template: '{0}'")]
    UnknownTemplate(String),
}

/// Which chart to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSection {
    pub symbol: String,
    pub timeframe: String,
    pub range: u32,
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            symbol: "BBCA".into(),
            timeframe: "D".into(),
            range: DEFAULT_RANGE,
        }
    }
}

/// Placeholder-data generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticSettings {
    /// The walk produces `bar_count + 1` candles.
    pub bar_count: usize,
    pub default_base_price: f64,
    /// Fixed seed for a reproducible walk; entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Extra or overriding per-symbol starting prices.
    pub base_prices: BTreeMap<String, f64>,
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        Self {
            bar_count: 200,
            default_base_price: 5000.0,
            seed: None,
            base_prices: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub chart: ChartSection,
    pub synthetic: SyntheticSettings,
    /// Inline scripts, run after the named templates.
    pub scripts: Vec<String>,
    /// Built-in template names.
    pub templates: Vec<String>,
}

impl ChartConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            symbol: self.chart.symbol.clone(),
            timeframe: self.chart.timeframe.clone(),
            range: self.chart.range,
        }
    }

    /// Template scripts (in listed order) followed by inline scripts.
    pub fn resolved_scripts(&self) -> Result<Vec<String>, ConfigError> {
        let mut scripts = Vec::with_capacity(self.templates.len() + self.scripts.len());
        for name in &self.templates {
            let template =
                find_template(name).ok_or_else(|| ConfigError::UnknownTemplate(name.clone()))?;
            scripts.push(template.script.to_string());
        }
        scripts.extend(self.scripts.iter().cloned());
        Ok(scripts)
    }
}
