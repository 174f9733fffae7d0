//! Per-bar logistic-regression signal engine.
//!
//! Each bar retrains a single scalar weight from zero over the trailing
//! `lookback` window (feature = bar position, label = close), rescales the
//! resulting loss/prediction curves into the recent price range, and runs a
//! three-state machine over them to emit entry and exit markers.

use serde::{Deserialize, Serialize};

use crate::domain::{
    closes, Candle, IndicatorResult, LineSeries, Marker, MarkerKind, ResultKind, SeriesPoint,
};
use crate::indicators::window::{highest, lowest};

/// Hard cap on gradient steps per bar, whatever the script asks for.
pub const MAX_TRAINING_ITERATIONS: usize = 200;

const LOSS_COLOR: &str = "#2196F3";
const PREDICTION_COLOR: &str = "#CDDC39";
const SIGNAL_LINE_COLOR: &str = "rgba(33, 150, 243, 0.6)";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    pub lookback: usize,
    /// Normalisation lookback for the min-max rescale.
    pub nlbk: usize,
    pub learning_rate: f64,
    pub iterations: usize,
    pub holding_period: usize,
    pub use_price_for_signal: bool,
    pub show_curves: bool,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            lookback: 2,
            nlbk: 2,
            learning_rate: 0.0009,
            iterations: 1000,
            holding_period: 1,
            use_price_for_signal: true,
            show_curves: false,
        }
    }
}

impl LogisticParams {
    /// Bars needed before the engine produces anything.
    pub fn required_bars(&self) -> usize {
        self.nlbk
            .saturating_add(10)
            .max(self.lookback.saturating_add(5))
    }
}

/// Result bundle plus trade markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignalOutput {
    pub result: Option<IndicatorResult>,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalState {
    #[default]
    Hold,
    Long,
    Short,
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Loss and prediction of one bar's fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFit {
    pub loss: f64,
    pub prediction: f64,
}

fn weighted_sum(x: &[f64], idx: usize, period: usize, w: f64) -> f64 {
    (0..period)
        .take_while(|&j| j <= idx)
        .fold(0.0, |acc, j| acc + x[idx - j] * w)
}

/// Train a scalar weight from zero on the window ending at `idx`.
pub fn train_bar(x: &[f64], y: &[f64], idx: usize, period: usize, rate: f64, iterations: usize) -> BarFit {
    let mut w = 0.0;
    let mut loss = 0.0;

    for _ in 0..iterations {
        let hypothesis = sigmoid(weighted_sum(x, idx, period, w));

        let h = hypothesis.clamp(1e-10, 1.0 - 1e-10);
        loss = -(y[idx] * h.ln() + (1.0 - y[idx]) * (1.0 - h).ln());

        let gradient = (0..period)
            .take_while(|&j| j <= idx)
            .fold(0.0, |acc, j| acc + x[idx - j] * (hypothesis - y[idx - j]))
            / period as f64;

        w -= rate * gradient;
    }

    BarFit {
        loss,
        prediction: sigmoid(weighted_sum(x, idx, period, w)),
    }
}

/// Linear map of `value` from `[lo, hi]` into `[min, max]`; midpoint when the
/// source range is empty.
pub fn minimax(value: f64, hi: f64, lo: f64, min: f64, max: f64) -> f64 {
    if hi == lo {
        return (max + min) / 2.0;
    }
    (max - min) * (value - lo) / (hi - lo) + min
}

/// Rescale `raw` into the trailing `nlbk`-bar close range. Bars before `nlbk` stay 0.
pub fn rescale(raw: &[f64], prices: &[f64], nlbk: usize) -> Vec<f64> {
    let mut scaled = vec![0.0; raw.len()];
    for i in nlbk..raw.len() {
        let hi = highest(prices, i, nlbk);
        let lo = lowest(prices, i, nlbk);
        scaled[i] = minimax(raw[i], highest(raw, i, nlbk), lowest(raw, i, nlbk), lo, hi);
    }
    scaled
}

/// Run the state machine and emit markers.
///
/// Within one bar markers are emitted as buy, sell, stopBuy, stopSell.
pub fn derive_markers(
    candles: &[Candle],
    scaled_loss: &[f64],
    scaled_pred: &[f64],
    params: &LogisticParams,
) -> Vec<Marker> {
    let n = candles.len();
    let mut states = vec![SignalState::Hold; n];
    let mut markers = Vec::new();
    let mut counter = 0usize;

    for i in params.nlbk.max(1)..n {
        let prev = states[i - 1];
        let close = candles[i].close;

        states[i] = if params.use_price_for_signal {
            if close < scaled_loss[i] {
                SignalState::Short
            } else if close > scaled_loss[i] {
                SignalState::Long
            } else {
                prev
            }
        } else {
            let under = scaled_loss[i] < scaled_pred[i];
            let under_prev = scaled_loss[i - 1] < scaled_pred[i - 1];
            let over = scaled_loss[i] > scaled_pred[i];
            let over_prev = scaled_loss[i - 1] > scaled_pred[i - 1];
            if under && !under_prev {
                SignalState::Short
            } else if over && !over_prev {
                SignalState::Long
            } else {
                prev
            }
        };

        let state = states[i];
        let changed = state != prev;
        counter = if changed { 0 } else { counter + 1 };
        let held = !changed && counter == params.holding_period;

        let time = candles[i].time;
        let (low, high) = (candles[i].low, candles[i].high);
        let mut emit = |kind, price| markers.push(Marker { time, kind, price });

        if changed && state == SignalState::Long {
            emit(MarkerKind::Buy, low);
        }
        if changed && state == SignalState::Short {
            emit(MarkerKind::Sell, high);
        }
        if (held && state == SignalState::Long) || (changed && state == SignalState::Short) {
            emit(MarkerKind::StopBuy, high);
        }
        if (held && state == SignalState::Short) || (changed && state == SignalState::Long) {
            emit(MarkerKind::StopSell, low);
        }
    }

    markers
}

/// Run the full engine over a candle history.
///
/// Returns an empty output when the history is shorter than
/// [`LogisticParams::required_bars`].
pub fn compute_logistic(candles: &[Candle], params: &LogisticParams) -> SignalOutput {
    let n = candles.len();
    if n < params.required_bars() {
        return SignalOutput::default();
    }
    // Zero-width windows would divide by zero; treat them as one bar.
    let params = LogisticParams {
        lookback: params.lookback.max(1),
        nlbk: params.nlbk.max(1),
        ..*params
    };

    let prices = closes(candles);
    let times: Vec<i64> = candles.iter().map(|c| c.time).collect();
    let base: Vec<f64> = (0..n).map(|i| (i + 1) as f64).collect();
    let iterations = params.iterations.min(MAX_TRAINING_ITERATIONS);

    let mut loss = vec![0.0; n];
    let mut prediction = vec![0.0; n];
    for i in params.lookback..n {
        let fit = train_bar(&base, &prices, i, params.lookback, params.learning_rate, iterations);
        loss[i] = fit.loss;
        prediction[i] = fit.prediction;
    }

    let scaled_loss = rescale(&loss, &prices, params.nlbk);
    let scaled_pred = rescale(&prediction, &prices, params.nlbk);
    let markers = derive_markers(candles, &scaled_loss, &scaled_pred, &params);

    let points = |values: &[f64]| -> Vec<SeriesPoint> {
        (params.nlbk..n)
            .map(|i| SeriesPoint {
                time: times[i],
                value: values[i],
            })
            .collect()
    };

    let mut lines = Vec::new();
    if params.show_curves {
        lines.push(LineSeries::new("Loss", LOSS_COLOR, 2).with_points(points(&scaled_loss)));
        lines.push(
            LineSeries::new("Prediction", PREDICTION_COLOR, 2).with_points(points(&scaled_pred)),
        );
    }
    lines.push(
        LineSeries::new("ML Signal Line", SIGNAL_LINE_COLOR, 1)
            .dashed()
            .with_points(points(&scaled_loss)),
    );

    SignalOutput {
        result: Some(IndicatorResult {
            name: "ML Logistic Regression".into(),
            kind: ResultKind::Line,
            lines,
        }),
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles};

    fn price_params(holding_period: usize) -> LogisticParams {
        LogisticParams {
            holding_period,
            ..LogisticParams::default()
        }
    }

    #[test]
    fn sigmoid_midpoint() {
        assert_approx(sigmoid(0.0), 0.5, 1e-15);
    }

    #[test]
    fn minimax_maps_and_handles_flat_source() {
        assert_approx(minimax(5.0, 10.0, 0.0, 100.0, 200.0), 150.0, 1e-12);
        assert_approx(minimax(3.0, 3.0, 3.0, 100.0, 200.0), 150.0, 1e-12);
    }

    #[test]
    fn zero_iterations_give_half_prediction() {
        let x = [1.0, 2.0, 3.0];
        let y = [10.0, 11.0, 12.0];
        let fit = train_bar(&x, &y, 2, 2, 0.001, 0);
        assert_eq!(fit.loss, 0.0);
        assert_approx(fit.prediction, 0.5, 1e-15);
    }

    #[test]
    fn one_step_matches_hand_computation() {
        // w = 0 -> h = 0.5; gradient = (3*(0.5-12) + 2*(0.5-11)) / 2 = -27.75
        let x = [1.0, 2.0, 3.0];
        let y = [10.0, 11.0, 12.0];
        let fit = train_bar(&x, &y, 2, 2, 0.01, 1);
        let h: f64 = 0.5;
        let expected_loss = -(12.0 * h.ln() + (1.0 - 12.0) * (1.0 - h).ln());
        assert_approx(fit.loss, expected_loss, 1e-12);
        let w = 0.2775;
        assert_approx(fit.prediction, sigmoid(3.0 * w + 2.0 * w), 1e-12);
    }

    #[test]
    fn rescale_leaves_warmup_at_zero() {
        let raw = [1.0, 2.0, 3.0, 2.0];
        let prices = [10.0, 20.0, 30.0, 40.0];
        let s = rescale(&raw, &prices, 2);
        assert_eq!(&s[..2], &[0.0, 0.0]);
        // window [2,3] -> [20,30]; value 3 at top
        assert_approx(s[2], 30.0, 1e-12);
        // window [3,2] -> [30,40]; value 2 at bottom
        assert_approx(s[3], 30.0, 1e-12);
    }

    #[test]
    fn price_mode_entry_and_exit_after_holding_period() {
        // closes 10; scaled loss drops below close at bar 3 and stays there.
        let candles = make_candles(&[10.0; 10]);
        let mut loss = vec![10.0; 10];
        for v in loss.iter_mut().skip(3) {
            *v = 5.0;
        }
        let pred = vec![0.0; 10];
        let markers = derive_markers(&candles, &loss, &pred, &price_params(2));

        let kinds: Vec<(usize, MarkerKind)> = markers
            .iter()
            .map(|m| (((m.time - candles[0].time) / 60) as usize, m.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (3, MarkerKind::Buy),
                (3, MarkerKind::StopSell),
                (5, MarkerKind::StopBuy),
            ]
        );
        assert_eq!(markers[0].price, candles[3].low);
        assert_eq!(markers[2].price, candles[5].high);
    }

    #[test]
    fn flip_to_short_closes_long_on_the_same_bar() {
        let candles = make_candles(&[10.0; 8]);
        let mut loss = vec![5.0; 8];
        for v in loss.iter_mut().skip(5) {
            *v = 15.0;
        }
        let markers = derive_markers(&candles, &loss, &[0.0; 8], &price_params(10));
        let at_5: Vec<MarkerKind> = markers
            .iter()
            .filter(|m| m.time == candles[5].time)
            .map(|m| m.kind)
            .collect();
        assert_eq!(at_5, vec![MarkerKind::Sell, MarkerKind::StopBuy]);
    }

    #[test]
    fn cross_mode_uses_previous_bar() {
        let candles = make_candles(&[10.0; 8]);
        let loss = [0.0, 0.0, 2.0, 2.0, 0.5, 0.5, 0.5, 0.5];
        let pred = [1.0; 8];
        let params = LogisticParams {
            use_price_for_signal: false,
            holding_period: 1,
            ..LogisticParams::default()
        };
        let markers = derive_markers(&candles, &loss, &pred, &params);
        let kinds: Vec<(i64, MarkerKind)> = markers
            .iter()
            .map(|m| ((m.time - candles[0].time) / 60, m.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (2, MarkerKind::Buy),
                (2, MarkerKind::StopSell),
                (3, MarkerKind::StopBuy),
                (4, MarkerKind::Sell),
                (4, MarkerKind::StopBuy),
                (5, MarkerKind::StopSell),
            ]
        );
    }

    #[test]
    fn short_history_is_empty() {
        let candles = make_candles(&[1.0; 11]);
        let out = compute_logistic(&candles, &LogisticParams::default());
        assert!(out.result.is_none());
        assert!(out.markers.is_empty());
    }

    #[test]
    fn required_bars_saturates() {
        let params = LogisticParams {
            nlbk: usize::MAX,
            lookback: usize::MAX - 1,
            ..LogisticParams::default()
        };
        assert_eq!(params.required_bars(), usize::MAX);
        let out = compute_logistic(&make_candles(&[1.0; 40]), &params);
        assert!(out.result.is_none());
    }

    #[test]
    fn lines_start_at_normalisation_lookback() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let candles = make_candles(&closes);
        let params = LogisticParams {
            show_curves: true,
            ..LogisticParams::default()
        };
        let result = compute_logistic(&candles, &params).result.unwrap();
        let labels: Vec<&str> = result.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Loss", "Prediction", "ML Signal Line"]);
        for line in &result.lines {
            assert_eq!(line.points.len(), 28);
            assert_eq!(line.points[0].time, candles[2].time);
            assert!(line.points.iter().all(|p| p.value.is_finite()));
        }
        assert_eq!(result.lines[0].points, result.lines[2].points);
    }
}
