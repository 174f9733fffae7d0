//! Built-in scripts offered to users as starting points.

/// A named, ready-to-run script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptTemplate {
    pub name: &'static str,
    pub script: &'static str,
}

pub const INDICATOR_TEMPLATES: &[ScriptTemplate] = &[
    ScriptTemplate { name: "SMA 20", script: "ta.sma(close, 20)" },
    ScriptTemplate { name: "SMA 50", script: "ta.sma(close, 50)" },
    ScriptTemplate { name: "SMA 200", script: "ta.sma(close, 200)" },
    ScriptTemplate { name: "EMA 12", script: "ta.ema(close, 12)" },
    ScriptTemplate { name: "EMA 26", script: "ta.ema(close, 26)" },
    ScriptTemplate { name: "RSI 14", script: "ta.rsi(close, 14)" },
    ScriptTemplate { name: "MACD", script: "ta.macd(close, 12, 26, 9)" },
    ScriptTemplate { name: "Bollinger Bands", script: "ta.bb(close, 20, 2)" },
];

const LOGISTIC_SCRIPT: &str = r#"// Machine Learning: Logistic Regression (v.3)
//@version=4
study("Machine Learning: Logistic Regression (v.3)", overlay=true)

lookback = input(2, "Lookback Window Size |2..n| (2)", minval=2)
nlbk = input(2, "Normalization Lookback |2..240| (120)", minval=2, maxval=240)
lrate = input(0.0009, "Learning Rate |0.0001..0.01|", minval=0.0001, maxval=0.01, step=0.0001)
iterations = input(1000, "Training Iterations |50..20000|", minval=50)
holding_p = input(1, "Holding Period |1..n|", minval=1)
curves = input(false, "Show Loss & Prediction Curves?")
useprice = input(true, "Use Price Data for Signal Generation?")

base = time
synth = close

sigmoid(z) => 1.0 / (1.0 + exp(-z))

[loss, prediction] = logistic_regression(base, synth, lookback, lrate, iterations)
"#;

const REGRESSION_SCRIPT: &str = r#"// ML2: Linear Regression Line with EMA
//@version=5
indicator("Linear Regression Line with EMA", overlay=true)

length = input(14, "Regression Length")
emaLength = input(20, "EMA Length")

x = bar_index
y = close
slope = ta.correlation(x, y, length) * (ta.stdev(y, length) / ta.stdev(x, length))
intercept = ta.sma(y, length) - slope * ta.sma(x, length)
plot(intercept + slope * x, "Linear Regression", color=color.red, linewidth=2)
plot(ta.ema(close, emaLength), "EMA", color=color.blue, linewidth=2)
"#;

const BULL_BEAR_SCRIPT: &str = r#"// ML3: Bull and Bear Power
//@version=4
study("Bull and Bear Power", shorttitle="BBP_NM")

window = input(title="Window", type=input.integer, defval=10)
smooth = input(title="Smooth", type=input.bool, defval=true)
smap = input(title="Smooth Factor", type=input.integer, defval=5)
sigma = input(title="Sigma", type=input.integer, defval=6)

f_exp_lr(_height, _length) => _height + _height / _length
"#;

pub const ML_TEMPLATES: &[ScriptTemplate] = &[
    ScriptTemplate { name: "ML Logistic Regression", script: LOGISTIC_SCRIPT },
    ScriptTemplate { name: "ML2 Linear Regression + EMA", script: REGRESSION_SCRIPT },
    ScriptTemplate { name: "ML3 Bull Bear Power", script: BULL_BEAR_SCRIPT },
];

/// Every template, indicators first.
pub fn all_templates() -> impl Iterator<Item = &'static ScriptTemplate> {
    INDICATOR_TEMPLATES.iter().chain(ML_TEMPLATES)
}

/// Case-insensitive lookup by template name.
pub fn find_template(name: &str) -> Option<&'static ScriptTemplate> {
    all_templates().find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{BullBearParams, LogisticParams, RegressionParams};
    use crate::script::{classify, ScriptKind};

    #[test]
    fn indicator_templates_parse_to_one_descriptor_each() {
        for t in INDICATOR_TEMPLATES {
            match classify(t.script) {
                ScriptKind::Generic(d) => assert_eq!(d.len(), 1, "{}", t.name),
                other => panic!("{} classified as {}", t.name, other.label()),
            }
        }
    }

    #[test]
    fn ml_templates_carry_engine_defaults() {
        assert_eq!(
            classify(ML_TEMPLATES[0].script),
            ScriptKind::LogisticRegression(LogisticParams::default())
        );
        assert_eq!(
            classify(ML_TEMPLATES[1].script),
            ScriptKind::LinearRegression(RegressionParams::default())
        );
        assert_eq!(
            classify(ML_TEMPLATES[2].script),
            ScriptKind::BullBear(BullBearParams::default())
        );
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(find_template("bollinger bands").map(|t| t.script), Some("ta.bb(close, 20, 2)"));
        assert!(find_template("nope").is_none());
    }
}
