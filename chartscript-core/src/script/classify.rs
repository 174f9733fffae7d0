//! Routes a script to exactly one calculator family.

use serde::Serialize;

use super::descriptor::IndicatorDescriptor;
use super::params::{parse_bull_bear_params, parse_logistic_params, parse_regression_params};
use super::parser::parse_indicators;
use crate::ml::{BullBearParams, LogisticParams, RegressionParams};

/// Classification outcome, carrying everything the chosen engine needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum ScriptKind {
    LogisticRegression(LogisticParams),
    LinearRegression(RegressionParams),
    BullBear(BullBearParams),
    Generic(Vec<IndicatorDescriptor>),
}

impl ScriptKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic_regression",
            Self::LinearRegression(_) => "linear_regression",
            Self::BullBear(_) => "bull_bear",
            Self::Generic(_) => "generic",
        }
    }
}

pub fn is_logistic_regression(script: &str) -> bool {
    script.contains("logistic_regression")
        || script.contains("Machine Learning")
        || script.contains("Logistic Regression")
        || script.to_ascii_lowercase().contains("sigmoid")
}

pub fn is_linear_regression(script: &str) -> bool {
    script.contains("Linear Regression Line with EMA")
        || script.contains("ML2")
        || (script.contains("Linear Regression")
            && script.contains("ema")
            && !script.contains("Bull and Bear"))
}

pub fn is_bull_bear(script: &str) -> bool {
    script.contains("Bull and Bear Power")
        || script.contains("BBP_NM")
        || script.contains("ML3")
        || script.contains("f_exp_lr")
}

/// Ordered, first match wins: logistic, regression, bull/bear, generic.
pub fn classify(script: &str) -> ScriptKind {
    if is_logistic_regression(script) {
        ScriptKind::LogisticRegression(parse_logistic_params(script))
    } else if is_linear_regression(script) {
        ScriptKind::LinearRegression(parse_regression_params(script))
    } else if is_bull_bear(script) {
        ScriptKind::BullBear(parse_bull_bear_params(script))
    } else {
        ScriptKind::Generic(parse_indicators(script))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_case_insensitive() {
        assert!(is_logistic_regression("y = SIGMOID(x)"));
        assert!(!is_logistic_regression("machine learning"));
    }

    #[test]
    fn logistic_beats_bull_bear() {
        let kind = classify("// Machine Learning\n// Bull and Bear Power");
        assert_eq!(kind.label(), "logistic_regression");
    }

    #[test]
    fn regression_is_tested_before_bull_bear() {
        assert_eq!(classify("ML2 ML3").label(), "linear_regression");
        assert_eq!(
            classify("Linear Regression Bull and Bear Power, ema").label(),
            "bull_bear"
        );
    }

    #[test]
    fn linear_regression_needs_lowercase_ema() {
        assert_eq!(classify("Linear Regression with EMA").label(), "generic");
        assert_eq!(classify("Linear Regression with ema").label(), "linear_regression");
    }

    #[test]
    fn generic_carries_descriptors() {
        match classify("ta.sma(close, 20)\nEMA 5") {
            ScriptKind::Generic(d) => assert_eq!(d.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn specialised_kinds_carry_parsed_params() {
        match classify("f_exp_lr\nwindow = input(defval=7)") {
            ScriptKind::BullBear(p) => assert_eq!(p.window, 7),
            other => panic!("unexpected {other:?}"),
        }
    }
}
