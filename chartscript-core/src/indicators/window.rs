//! Trailing-window statistics shared by the calculators and the ML engines.
//!
//! Every helper looks at the window ending at `end` (inclusive) and reaching
//! back at most `period` bars, clipped at index 0. Iteration runs from the
//! newest bar backwards, so "k bars ago" is the loop counter.

/// Left-to-right sum starting at `0.0`.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

/// Indices of the window, newest first.
fn back(end: usize, period: usize) -> impl Iterator<Item = usize> {
    (0..period).take_while(move |&k| k <= end).map(move |k| end - k)
}

pub fn highest(values: &[f64], end: usize, period: usize) -> f64 {
    back(end, period).fold(f64::NEG_INFINITY, |acc, i| acc.max(values[i]))
}

pub fn lowest(values: &[f64], end: usize, period: usize) -> f64 {
    back(end, period).fold(f64::INFINITY, |acc, i| acc.min(values[i]))
}

/// Bars since the window maximum; ties resolve to the most recent bar.
pub fn highest_bars_ago(values: &[f64], end: usize, period: usize) -> usize {
    let mut best = f64::NEG_INFINITY;
    let mut bars_ago = 0;
    for (k, i) in back(end, period).enumerate() {
        if values[i] > best {
            best = values[i];
            bars_ago = k;
        }
    }
    bars_ago
}

/// Bars since the window minimum; ties resolve to the most recent bar.
pub fn lowest_bars_ago(values: &[f64], end: usize, period: usize) -> usize {
    let mut best = f64::INFINITY;
    let mut bars_ago = 0;
    for (k, i) in back(end, period).enumerate() {
        if values[i] < best {
            best = values[i];
            bars_ago = k;
        }
    }
    bars_ago
}

/// Mean of the (possibly clipped) window; 0 for an empty window.
pub fn mean(values: &[f64], end: usize, period: usize) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for i in back(end, period) {
        total += values[i];
        count += 1;
    }
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

/// Population standard deviation; 0 for windows of fewer than two bars.
pub fn stdev(values: &[f64], end: usize, period: usize) -> f64 {
    let m = mean(values, end, period);
    let mut sum_sq = 0.0;
    let mut count = 0usize;
    for i in back(end, period) {
        let diff = values[i] - m;
        sum_sq += diff * diff;
        count += 1;
    }
    if count > 1 {
        (sum_sq / count as f64).sqrt()
    } else {
        0.0
    }
}

/// Pearson correlation of two aligned series over the window.
///
/// Returns 0 when fewer than two bars are available or either side has zero variance.
pub fn correlation(x: &[f64], y: &[f64], end: usize, period: usize) -> f64 {
    let n = period.min(end + 1);
    if n < 2 {
        return 0.0;
    }
    let (mut sx, mut sy, mut sxy, mut sx2, mut sy2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for i in back(end, n) {
        sx += x[i];
        sy += y[i];
        sxy += x[i] * y[i];
        sx2 += x[i] * x[i];
        sy2 += y[i] * y[i];
    }
    let nf = n as f64;
    let num = nf * sxy - sx * sy;
    let den = ((nf * sx2 - sx * sx) * (nf * sy2 - sy * sy)).sqrt();
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Gaussian-weighted moving average over `window` bars ending at `end`.
///
/// The kernel is centred `floor(offset * (window - 1))` bars back from `end`
/// with width `window / sigma`. Returns 0 if the weights sum to zero.
pub fn gaussian_average(values: &[f64], end: usize, window: usize, offset: f64, sigma: f64) -> f64 {
    let m = (offset * (window as f64 - 1.0)).floor();
    let s = window as f64 / sigma;
    let mut norm = 0.0;
    let mut total = 0.0;
    for (k, i) in back(end, window).enumerate() {
        let d = k as f64 - m;
        let w = (-(d * d) / (2.0 * s * s)).exp();
        norm += w;
        total += values[i] * w;
    }
    if norm != 0.0 {
        total / norm
    } else {
        0.0
    }
}
