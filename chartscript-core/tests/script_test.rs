//! Classification and parsing over whole scripts.

use chartscript_core::ml::{BullBearParams, LogisticParams, RegressionParams};
use chartscript_core::script::templates::all_templates;
use chartscript_core::script::*;

#[test]
fn logistic_beats_bull_bear() {
    let script = "// Bull and Bear Power\nz = sigmoid(x)\nwindow = input(defval=20)";
    assert!(matches!(classify(script), ScriptKind::LogisticRegression(_)));
}

#[test]
fn regression_beats_bull_bear_when_both_markers_present() {
    let script = "// ML2\n// BBP_NM";
    assert!(matches!(classify(script), ScriptKind::LinearRegression(_)));
}

#[test]
fn specialised_params_fall_back_to_defaults() {
    assert_eq!(
        classify("Logistic Regression"),
        ScriptKind::LogisticRegression(LogisticParams::default())
    );
    assert_eq!(
        classify("ML2"),
        ScriptKind::LinearRegression(RegressionParams::default())
    );
    assert_eq!(classify("ML3"), ScriptKind::BullBear(BullBearParams::default()));
}

#[test]
fn logistic_params_are_read_from_inputs() {
    let script = r#"// Machine Learning
lookback = input(3, "Lookback")
nlbk = input(defval=20)
lrate = input(0.005)
iterations = input(50)
holding_p = input(4)
curves = input(true)
useprice = input(false)"#;
    let ScriptKind::LogisticRegression(p) = classify(script) else {
        panic!("expected logistic regression");
    };
    assert_eq!(p.lookback, 3);
    assert_eq!(p.nlbk, 20);
    assert_eq!(p.learning_rate, 0.005);
    assert_eq!(p.iterations, 50);
    assert_eq!(p.holding_period, 4);
    assert!(p.show_curves);
    assert!(!p.use_price_for_signal);
}

#[test]
fn generic_script_keeps_line_order() {
    let script = "\
// my overlay
ta.bb(close, 20, 2)
SMA 10
ta.ema(close, 21), color=color.purple
not an indicator
MACD 12 26 9
";
    let ScriptKind::Generic(descriptors) = classify(script) else {
        panic!("expected generic");
    };
    let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["BB 20,2", "SMA 10", "EMA 21", "MACD"]);
    assert_eq!(descriptors[2].color.as_deref(), Some("#AB47BC"));
    assert_eq!(descriptors[3].kind, IndicatorKind::Macd);
}

#[test]
fn empty_script_is_generic_and_empty() {
    assert_eq!(classify(""), ScriptKind::Generic(Vec::new()));
}

#[test]
fn every_template_has_a_unique_name() {
    let mut names: Vec<&str> = all_templates().map(|t| t.name).collect();
    let before = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), before);
    assert_eq!(before, INDICATOR_TEMPLATES.len() + ML_TEMPLATES.len());
}
