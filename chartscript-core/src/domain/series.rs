//! Renderable output: points, lines, and named indicator results.

use serde::{Deserialize, Serialize};

/// A single value aligned to a candle time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One drawable trace of an indicator result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub label: String,
    pub color: String,
    pub points: Vec<SeriesPoint>,
    pub width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<LineStyle>,
}

impl LineSeries {
    pub fn new(label: impl Into<String>, color: impl Into<String>, width: u32) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            points: Vec::new(),
            width,
            style: None,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.style = Some(LineStyle::Dashed);
        self
    }

    pub fn with_points(mut self, points: Vec<SeriesPoint>) -> Self {
        self.points = points;
        self
    }

    /// Pair `values` with `times` by index, keeping only defined (non-NaN) entries.
    pub fn from_values(mut self, times: &[i64], values: &[f64]) -> Self {
        self.points = times
            .iter()
            .zip(values)
            .filter(|(_, v)| !v.is_nan())
            .map(|(&time, &value)| SeriesPoint { time, value })
            .collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Presentation hint for an indicator result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Line,
    Histogram,
    Band,
}

/// Named bundle of lines produced by one calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub name: String,
    pub kind: ResultKind,
    pub lines: Vec<LineSeries>,
}

impl IndicatorResult {
    /// Returns true when no line carries a single point.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(LineSeries::is_empty)
    }

    pub fn line(&self, label: &str) -> Option<&LineSeries> {
        self.lines.iter().find(|l| l.label == label)
    }
}
