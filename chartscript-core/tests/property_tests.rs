//! Property tests for calculator and orchestrator invariants.
//!
//! Uses proptest to verify:
//! 1. SMA output length and warmup
//! 2. Bollinger ordering and width identity
//! 3. RSI bounds
//! 4. Bull power non-negative, bear power non-positive
//! 5. Overlay markers sorted by time
//! 6. Any numeric literal in a script input leaves the orchestrator standing

use chartscript_core::compute_overlays;
use chartscript_core::domain::Candle;
use chartscript_core::indicators::{bands_of_series, rsi_of_series, sma_of_series};
use chartscript_core::ml::bull_bear::bull_bear_series;
use chartscript_core::ml::BullBearParams;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0), 0..120)
}

fn to_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Candle::new(i as i64 * 60, c, c * 1.01, c * 0.99, c))
        .collect()
}

proptest! {
    #[test]
    fn sma_length_and_warmup(closes in arb_closes(), period in 1usize..30) {
        let sma = sma_of_series(&closes, period);
        prop_assert_eq!(sma.len(), closes.len());
        let defined = sma.iter().filter(|v| !v.is_nan()).count();
        prop_assert_eq!(defined, closes.len().saturating_sub(period - 1));
    }

    #[test]
    fn bollinger_is_ordered(closes in arb_closes(), period in 1usize..30, mult in 0.0..4.0_f64) {
        let bands = bands_of_series(&closes, period, mult);
        for i in 0..closes.len() {
            if bands.middle[i].is_nan() {
                continue;
            }
            prop_assert!(bands.lower[i] <= bands.middle[i] + 1e-9);
            prop_assert!(bands.middle[i] <= bands.upper[i] + 1e-9);
        }
    }

    #[test]
    fn rsi_is_bounded(closes in arb_closes(), period in 1usize..30) {
        for v in rsi_of_series(&closes, period).into_iter().filter(|v| !v.is_nan()) {
            prop_assert!((0.0..=100.0).contains(&v), "rsi {}", v);
        }
    }

    #[test]
    fn bull_and_bear_signs(closes in arb_closes(), window in 1usize..20, smooth in any::<bool>()) {
        let params = BullBearParams { window, smooth, ..BullBearParams::default() };
        let s = bull_bear_series(&closes, &params);
        prop_assert!(s.bull.iter().all(|&b| b >= 0.0));
        prop_assert!(s.bear.iter().all(|&b| b <= 0.0));
    }

    #[test]
    fn overlay_markers_are_sorted(closes in arb_closes(), holding in 1usize..5) {
        let candles = to_candles(&closes);
        let script = format!("logistic_regression\nholding_p = input({holding})\nuseprice = input(false)");
        let set = compute_overlays(&candles, &[script.as_str(), "ML Logistic Regression"]);
        prop_assert!(set.markers.windows(2).all(|w| w[0].time <= w[1].time));
    }
}

// ── Script inputs ────────────────────────────────────────────────────

/// Header that routes a script to each engine, and the inputs it reads.
const ENGINE_INPUTS: &[(&str, &[&str])] = &[
    ("logistic_regression", &["lookback", "nlbk", "lrate", "iterations", "holding_p"]),
    ("ML2", &["length", "emaLength"]),
    ("ML3", &["window", "smap", "sigma"]),
];

fn arb_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,30}",
        "[0-9]{1,4}\\.[0-9]{1,4}",
        "-[0-9]{1,8}",
        Just("0".to_string()),
        Just(".5".to_string()),
        any::<bool>().prop_map(|b| b.to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn engine_inputs_never_panic(
        closes in prop::collection::vec(1.0..500.0_f64, 0..80),
        engine in 0usize..ENGINE_INPUTS.len(),
        literals in prop::collection::vec(arb_literal(), 5),
        defval in any::<bool>(),
    ) {
        let (header, names) = ENGINE_INPUTS[engine];
        let mut script = header.to_string();
        for (name, literal) in names.iter().zip(&literals) {
            if defval {
                script.push_str(&format!("\n{name} = input(title=\"x\", defval={literal})"));
            } else {
                script.push_str(&format!("\n{name} = input({literal})"));
            }
        }
        let set = compute_overlays(&to_candles(&closes), &[script.as_str()]);
        prop_assert!(set.results.len() <= 1);
        prop_assert!(set.markers.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn generic_periods_never_panic(
        closes in prop::collection::vec(1.0..500.0_f64, 0..80),
        a in "[0-9]{1,25}",
        b in "[0-9]{1,25}",
        c in "[0-9]{1,25}",
    ) {
        let script = format!(
            "sma {a}\nema {b}\nrsi {c}\nmacd {a} {b} {c}\nbb {a} {c}\nta.bb(close, {b}, {c}.5)"
        );
        let set = compute_overlays(&to_candles(&closes), &[script.as_str()]);
        prop_assert!(set.results.len() <= 6);
        prop_assert!(set.markers.is_empty());
    }
}
