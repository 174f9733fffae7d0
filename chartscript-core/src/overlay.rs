//! Multi-script orchestration: every script over one candle history.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Candle, IndicatorResult, Marker};
use crate::indicators::{calculate, ColorCursor};
use crate::ml::{compute_bull_bear, compute_logistic, compute_regression};
use crate::script::{classify, ScriptKind};

/// Everything a chart needs to draw for one recompute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlaySet {
    pub results: Vec<IndicatorResult>,
    /// Ascending by time; same-time markers keep emission order.
    pub markers: Vec<Marker>,
}

impl OverlaySet {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.markers.is_empty()
    }
}

/// Run every script, in order, and merge the output.
///
/// Pure: the same candles and scripts always give the same set. The colour
/// cursor starts fresh on every call and is shared by all generic scripts.
pub fn compute_overlays<S: AsRef<str>>(candles: &[Candle], scripts: &[S]) -> OverlaySet {
    let mut set = OverlaySet::default();
    let mut cursor = ColorCursor::new();

    for (index, script) in scripts.iter().enumerate() {
        let kind = classify(script.as_ref());
        let label = kind.label();
        let before = set.results.len();

        match kind {
            ScriptKind::LogisticRegression(params) => {
                let output = compute_logistic(candles, &params);
                set.results.extend(output.result);
                set.markers.extend(output.markers);
            }
            ScriptKind::LinearRegression(params) => {
                set.results.extend(compute_regression(candles, &params));
            }
            ScriptKind::BullBear(params) => {
                set.results.extend(compute_bull_bear(candles, &params));
            }
            ScriptKind::Generic(descriptors) => {
                for descriptor in &descriptors {
                    set.results.extend(calculate(descriptor, candles, &mut cursor));
                }
            }
        }

        debug!(
            script = index,
            kind = label,
            results = set.results.len() - before,
            "routed script"
        );
    }

    set.markers.sort_by_key(|m| m.time);
    set
}
