//! Turns one generic [`IndicatorDescriptor`] into a renderable result.
//!
//! Each descriptor is mapped to boxed [`Indicator`]s, one per output line,
//! then every indicator runs over the full candle history.

use super::{Bollinger, Ema, Indicator, Macd, Rsi, Sma};
use crate::domain::{Candle, IndicatorResult, LineSeries, ResultKind};
use crate::script::{IndicatorDescriptor, IndicatorKind};

/// Fallback palette, cycled by [`ColorCursor`].
pub const DEFAULT_COLORS: [&str; 8] = [
    "#2196F3", "#FF9800", "#26A69A", "#EF5350", "#AB47BC", "#FFEB3B", "#00BCD4", "#E040FB",
];

const BAND_EDGE_COLOR: &str = "rgba(255, 152, 0, 0.5)";
const BAND_MIDDLE_COLOR: &str = "#FF9800";
const MACD_COLOR: &str = "#2196F3";
const SIGNAL_COLOR: &str = "#FF9800";

/// Position in [`DEFAULT_COLORS`], threaded through one overlay batch.
///
/// Advances once per generic descriptor, whether or not the descriptor
/// carries its own colour or produces any points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCursor {
    index: usize,
}

impl ColorCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    /// Colour at the current position, then advance.
    pub fn advance(&mut self) -> &'static str {
        let color = DEFAULT_COLORS[self.index % DEFAULT_COLORS.len()];
        self.index += 1;
        color
    }
}

/// One output line and the indicator that fills it.
struct PlannedLine {
    series: LineSeries,
    indicator: Box<dyn Indicator>,
}

impl PlannedLine {
    fn new(series: LineSeries, indicator: impl Indicator + 'static) -> Self {
        Self {
            series,
            indicator: Box::new(indicator),
        }
    }
}

struct Plan {
    name: String,
    kind: ResultKind,
    lines: Vec<PlannedLine>,
}

/// Build the indicators a descriptor needs.
///
/// `None` when any period is zero; such a descriptor draws nothing.
fn plan(descriptor: &IndicatorDescriptor, color: &str) -> Option<Plan> {
    let nonzero = |name: &str, default: usize| {
        let value = descriptor.param_usize(name, default);
        (value > 0).then_some(value)
    };
    let line = |planned: PlannedLine| Plan {
        name: descriptor.name.clone(),
        kind: ResultKind::Line,
        lines: vec![planned],
    };
    let series = |width: u32| LineSeries::new(descriptor.name.clone(), color, width);

    match descriptor.kind {
        IndicatorKind::Sma => {
            let period = nonzero("period", 0)?;
            Some(line(PlannedLine::new(series(2), Sma::new(period))))
        }
        IndicatorKind::Ema => {
            let period = nonzero("period", 0)?;
            Some(line(PlannedLine::new(series(2), Ema::new(period))))
        }
        IndicatorKind::Rsi => {
            let period = nonzero("period", 0)?;
            Some(line(PlannedLine::new(series(1), Rsi::new(period))))
        }
        IndicatorKind::Macd => {
            let fast = nonzero("fast", 12)?;
            let slow = nonzero("slow", 26)?;
            let signal = nonzero("signal", 9)?;
            Some(Plan {
                name: "MACD".into(),
                kind: ResultKind::Histogram,
                lines: vec![
                    PlannedLine::new(
                        LineSeries::new("MACD", MACD_COLOR, 2),
                        Macd::line(fast, slow, signal),
                    ),
                    PlannedLine::new(
                        LineSeries::new("Signal", SIGNAL_COLOR, 1),
                        Macd::signal(fast, slow, signal),
                    ),
                ],
            })
        }
        IndicatorKind::Bb => {
            let period = nonzero("period", 20)?;
            let mult = descriptor.param("stddev", 2.0);
            Some(Plan {
                name: descriptor.name.clone(),
                kind: ResultKind::Band,
                lines: vec![
                    PlannedLine::new(
                        LineSeries::new("Upper", BAND_EDGE_COLOR, 1).dashed(),
                        Bollinger::upper(period, mult),
                    ),
                    PlannedLine::new(
                        LineSeries::new("Middle", BAND_MIDDLE_COLOR, 1),
                        Bollinger::middle(period, mult),
                    ),
                    PlannedLine::new(
                        LineSeries::new("Lower", BAND_EDGE_COLOR, 1).dashed(),
                        Bollinger::lower(period, mult),
                    ),
                ],
            })
        }
    }
}

/// Compute one descriptor over the candle history.
///
/// Returns `None` when every line is empty (not enough history for the period).
pub fn calculate(
    descriptor: &IndicatorDescriptor,
    candles: &[Candle],
    cursor: &mut ColorCursor,
) -> Option<IndicatorResult> {
    let fallback = cursor.advance();
    let color = descriptor.color.as_deref().unwrap_or(fallback);
    let plan = plan(descriptor, color)?;
    let times: Vec<i64> = candles.iter().map(|c| c.time).collect();

    let lines = plan
        .lines
        .into_iter()
        .map(|line| {
            let values = line.indicator.compute(candles);
            line.series.from_values(&times, &values)
        })
        .collect();
    let result = IndicatorResult {
        name: plan.name,
        kind: plan.kind,
        lines,
    };

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}
