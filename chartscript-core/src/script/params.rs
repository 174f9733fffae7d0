//! Reads `name = input(...)` assignments out of specialised scripts.
//!
//! The value is the `defval = <literal>` argument when present, else the first
//! positional literal. Anything missing or of the wrong type falls back to the
//! engine default.

use std::sync::LazyLock;

use regex::Regex;

use crate::ml::{BullBearParams, LogisticParams, RegressionParams};

macro_rules! re {
    ($pat:expr) => {
        LazyLock::new(|| Regex::new($pat).unwrap())
    };
}

/// Largest accepted integer input; bigger literals are clamped to it.
pub const MAX_LENGTH: usize = 100_000;

static RE_INPUT: LazyLock<Regex> = re!(r"([A-Za-z_][A-Za-z0-9_]*)\s*=\s*input\s*\(([^)]*)");
static RE_DEFVAL: LazyLock<Regex> = re!(r"defval\s*=\s*(true|false|[0-9]*\.?[0-9]+)");
static RE_POSITIONAL: LazyLock<Regex> = re!(r"^\s*(true|false|[0-9]*\.?[0-9]+)");

/// A literal found inside an `input(...)` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Number(f64),
    Bool(bool),
}

impl Literal {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "true" => Some(Self::Bool(true)),
            "false" => Some(Self::Bool(false)),
            _ => raw.parse().ok().map(Self::Number),
        }
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(v),
            Self::Bool(_) => None,
        }
    }

    /// Integer view; fractional literals truncate.
    pub fn as_usize(self) -> Option<usize> {
        self.as_f64().map(|v| v.trunc() as usize)
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            Self::Number(_) => None,
        }
    }
}

/// Value of the first `name = input(...)` assignment in `script`.
pub fn input_literal(script: &str, name: &str) -> Option<Literal> {
    let args = RE_INPUT
        .captures_iter(script)
        .find(|c| &c[1] == name)?
        .get(2)?
        .as_str();
    let raw = RE_DEFVAL
        .captures(args)
        .or_else(|| RE_POSITIONAL.captures(args))?
        .get(1)?
        .as_str();
    Literal::parse(raw)
}

fn input_usize(script: &str, name: &str, default: usize) -> usize {
    input_literal(script, name)
        .and_then(Literal::as_usize)
        .map_or(default, |v| v.min(MAX_LENGTH))
}

fn input_f64(script: &str, name: &str, default: f64) -> f64 {
    input_literal(script, name)
        .and_then(Literal::as_f64)
        .unwrap_or(default)
}

fn input_bool(script: &str, name: &str, default: bool) -> bool {
    input_literal(script, name)
        .and_then(Literal::as_bool)
        .unwrap_or(default)
}

pub fn parse_logistic_params(script: &str) -> LogisticParams {
    let d = LogisticParams::default();
    LogisticParams {
        lookback: input_usize(script, "lookback", d.lookback),
        nlbk: input_usize(script, "nlbk", d.nlbk),
        learning_rate: input_f64(script, "lrate", d.learning_rate),
        iterations: input_usize(script, "iterations", d.iterations),
        holding_period: input_usize(script, "holding_p", d.holding_period),
        show_curves: input_bool(script, "curves", d.show_curves),
        use_price_for_signal: input_bool(script, "useprice", d.use_price_for_signal),
    }
}

pub fn parse_regression_params(script: &str) -> RegressionParams {
    let d = RegressionParams::default();
    RegressionParams {
        regression_length: input_usize(script, "length", d.regression_length),
        ema_length: input_usize(script, "emaLength", d.ema_length),
    }
}

pub fn parse_bull_bear_params(script: &str) -> BullBearParams {
    let d = BullBearParams::default();
    BullBearParams {
        window: input_usize(script, "window", d.window),
        smooth: input_bool(script, "smooth", d.smooth),
        smooth_factor: input_usize(script, "smap", d.smooth_factor),
        sigma: input_literal(script, "sigma")
            .and_then(Literal::as_usize)
            .map_or(d.sigma, |v| v.min(MAX_LENGTH) as f64),
    }
}
