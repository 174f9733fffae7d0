//! Bull/bear power oscillator with a split direction trace.

use serde::{Deserialize, Serialize};

use crate::domain::{closes, Candle, IndicatorResult, LineSeries, ResultKind, SeriesPoint};
use crate::indicators::window::{gaussian_average, highest, highest_bars_ago, lowest, lowest_bars_ago};

const SMOOTHING_OFFSET: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BullBearParams {
    pub window: usize,
    pub smooth: bool,
    pub smooth_factor: usize,
    pub sigma: f64,
}

impl Default for BullBearParams {
    fn default() -> Self {
        Self {
            window: 10,
            smooth: true,
            smooth_factor: 5,
            sigma: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionColor {
    Green,
    Red,
    Yellow,
}

impl DirectionColor {
    /// Green and yellow bars belong to the rising trace.
    pub fn is_rising(self) -> bool {
        !matches!(self, Self::Red)
    }
}

/// Per-bar oscillator values, index-aligned with the candles.
#[derive(Debug, Clone, PartialEq)]
pub struct BullBearSeries {
    pub bull: Vec<f64>,
    pub bear: Vec<f64>,
    pub direction: Vec<f64>,
    pub color: Vec<DirectionColor>,
}

/// `height + height / bars_ago`, with a same-bar extreme counting as one bar.
pub fn extended_gap(height: f64, bars_ago: usize) -> f64 {
    height + height / bars_ago.max(1) as f64
}

/// Compute the raw series. Bars before `window - 1` hold 0 and yellow.
pub fn bull_bear_series(prices: &[f64], params: &BullBearParams) -> BullBearSeries {
    let n = prices.len();
    let window = params.window.max(1);
    let mut bull = vec![0.0; n];
    let mut bear = vec![0.0; n];
    let mut direction = vec![0.0; n];
    let mut color = vec![DirectionColor::Yellow; n];

    for i in window - 1..n {
        let hi = highest(prices, i, window);
        let lo = lowest(prices, i, window);

        let bear_raw = extended_gap(hi - prices[i], highest_bars_ago(prices, i, window));
        bear[i] = if bear_raw > 0.0 { -bear_raw } else { 0.0 };

        let bull_raw = extended_gap(prices[i] - lo, lowest_bars_ago(prices, i, window));
        bull[i] = if bull_raw > 0.0 { bull_raw } else { 0.0 };
    }

    if params.smooth {
        let raw: Vec<f64> = bull.iter().zip(&bear).map(|(b, r)| b + r).collect();
        for i in window - 1..n {
            direction[i] =
                gaussian_average(&raw, i, params.smooth_factor, SMOOTHING_OFFSET, params.sigma);
        }
        for i in window..n {
            color[i] = if direction[i] > direction[i - 1] {
                DirectionColor::Green
            } else if direction[i] < direction[i - 1] {
                DirectionColor::Red
            } else {
                DirectionColor::Yellow
            };
        }
    } else {
        for i in window - 1..n {
            direction[i] = bull[i] * 3.0 + bear[i] * 3.0;
            color[i] = if direction[i] > bull[i] {
                DirectionColor::Green
            } else if direction[i] < bear[i] {
                DirectionColor::Red
            } else {
                DirectionColor::Yellow
            };
        }
    }

    BullBearSeries {
        bull,
        bear,
        direction,
        color,
    }
}

/// Split the direction series into rising and falling traces from `start`.
///
/// At every colour transition the previous bar's point is repeated into the
/// trace being entered so the two traces meet.
pub fn split_direction(
    times: &[i64],
    direction: &[f64],
    color: &[DirectionColor],
    start: usize,
) -> (Vec<SeriesPoint>, Vec<SeriesPoint>) {
    let mut rising = Vec::new();
    let mut falling = Vec::new();
    let point = |i: usize| SeriesPoint {
        time: times[i],
        value: direction[i],
    };

    for i in start..times.len() {
        let is_rising = color[i].is_rising();
        let transition = i > start && color[i - 1].is_rising() != is_rising;
        let trace = if is_rising { &mut rising } else { &mut falling };
        if transition {
            trace.push(point(i - 1));
        }
        trace.push(point(i));
    }

    (rising, falling)
}

/// Returns `None` when fewer than `window + 5` candles are available.
pub fn compute_bull_bear(candles: &[Candle], params: &BullBearParams) -> Option<IndicatorResult> {
    let n = candles.len();
    if n < params.window.saturating_add(5) {
        return None;
    }

    let prices = closes(candles);
    let times: Vec<i64> = candles.iter().map(|c| c.time).collect();
    let series = bull_bear_series(&prices, params);
    let start = params.window.max(1) - 1;

    let aligned = |values: &[f64]| -> Vec<SeriesPoint> {
        (start..n)
            .map(|i| SeriesPoint {
                time: times[i],
                value: values[i],
            })
            .collect()
    };
    let (rising, falling) = split_direction(&times, &series.direction, &series.color, start);

    Some(IndicatorResult {
        name: "ML3 Bull Bear Power".into(),
        kind: ResultKind::Line,
        lines: vec![
            LineSeries::new("Bear", "#FF4444", 1).with_points(aligned(&series.bear)),
            LineSeries::new("Bull", "#44FF44", 1).with_points(aligned(&series.bull)),
            LineSeries::new("Dir ▲", "#00FF00", 3).with_points(rising),
            LineSeries::new("Dir ▼", "#FF0055", 3).with_points(falling),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn extended_gap_clamps_bars_ago() {
        assert_eq!(extended_gap(2.0, 0), 4.0);
        assert_eq!(extended_gap(2.0, 1), 4.0);
        assert_eq!(extended_gap(2.0, 4), 2.5);
    }

    #[test]
    fn bull_and_bear_from_window_extremes() {
        // window 3 at bar 3 over [12, 10, 11]: high 12 two bars ago, low 10 one bar ago
        let prices = [5.0, 12.0, 10.0, 11.0];
        let params = BullBearParams {
            window: 3,
            smooth: false,
            ..BullBearParams::default()
        };
        let s = bull_bear_series(&prices, &params);
        assert_approx(s.bear[3], -(1.0 + 1.0 / 2.0), DEFAULT_EPSILON);
        assert_approx(s.bull[3], 1.0 + 1.0, DEFAULT_EPSILON);
        assert_eq!(s.bull[0], 0.0);
        assert_eq!(s.bear[1], 0.0);
    }

    #[test]
    fn close_at_high_has_no_bear_power() {
        let prices = [1.0, 2.0, 3.0, 4.0];
        let params = BullBearParams {
            window: 2,
            smooth: false,
            ..BullBearParams::default()
        };
        let s = bull_bear_series(&prices, &params);
        assert_eq!(s.bear[3], 0.0);
        assert!(s.bull[3] > 0.0);
        assert_eq!(s.color[3], DirectionColor::Green);
    }

    #[test]
    fn first_smoothed_bar_is_yellow() {
        let prices: Vec<f64> = (0..20).map(|i| (i as f64 * 0.7).sin() * 10.0 + 50.0).collect();
        let s = bull_bear_series(&prices, &BullBearParams::default());
        assert_eq!(s.color[9], DirectionColor::Yellow);
    }

    #[test]
    fn split_duplicates_transition_points() {
        use DirectionColor::*;
        let times = [0, 1, 2, 3, 4];
        let direction = [0.0, 1.0, 2.0, 3.0, 4.0];
        let color = [Yellow, Green, Red, Red, Yellow];
        let (rising, falling) = split_direction(&times, &direction, &color, 0);
        let r: Vec<i64> = rising.iter().map(|p| p.time).collect();
        let f: Vec<i64> = falling.iter().map(|p| p.time).collect();
        assert_eq!(r, vec![0, 1, 3, 4]);
        assert_eq!(f, vec![1, 2, 3]);
    }

    #[test]
    fn result_shape() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.4).cos() * 3.0).collect();
        let candles = make_candles(&closes);
        let result = compute_bull_bear(&candles, &BullBearParams::default()).unwrap();
        let labels: Vec<&str> = result.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Bear", "Bull", "Dir ▲", "Dir ▼"]);
        assert_eq!(result.lines[0].points.len(), 31);
        assert_eq!(result.lines[2].width, 3);
    }

    #[test]
    fn short_history_is_none() {
        let candles = make_candles(&[1.0; 14]);
        assert!(compute_bull_bear(&candles, &BullBearParams::default()).is_none());
    }

    #[test]
    fn maximal_window_is_none_not_overflow() {
        let candles = make_candles(&[1.0; 30]);
        let params = BullBearParams {
            window: usize::MAX,
            ..BullBearParams::default()
        };
        assert!(compute_bull_bear(&candles, &params).is_none());
    }
}
