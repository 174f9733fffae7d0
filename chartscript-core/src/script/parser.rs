//! Line-oriented parser for generic indicator scripts.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::descriptor::{IndicatorDescriptor, IndicatorKind};
use super::palette::resolve_color;

macro_rules! re {
    ($pat:expr) => {
        LazyLock::new(|| Regex::new($pat).unwrap())
    };
}

static RE_SMA_CALL: LazyLock<Regex> = re!(r"(?i)(?:ta\.)?sma\s*\(\s*close\s*,\s*([0-9]+)\s*\)");
static RE_EMA_CALL: LazyLock<Regex> = re!(r"(?i)(?:ta\.)?ema\s*\(\s*close\s*,\s*([0-9]+)\s*\)");
static RE_RSI_CALL: LazyLock<Regex> = re!(r"(?i)(?:ta\.)?rsi\s*\(\s*close\s*,\s*([0-9]+)\s*\)");
static RE_MACD_CALL: LazyLock<Regex> =
    re!(r"(?i)(?:ta\.)?macd\s*\(\s*close\s*,\s*([0-9]+)\s*,\s*([0-9]+)\s*,\s*([0-9]+)\s*\)");
static RE_BB_CALL: LazyLock<Regex> =
    re!(r"(?i)(?:ta\.)?bb\s*\(\s*close\s*,\s*([0-9]+)\s*,\s*([0-9]+\.?[0-9]*)\s*\)");
static RE_SINGLE_SHORT: LazyLock<Regex> = re!(r"(?i)^(sma|ema|rsi)\s+([0-9]+)$");
static RE_MACD_SHORT: LazyLock<Regex> = re!(r"(?i)^macd\s+([0-9]+)\s+([0-9]+)\s+([0-9]+)$");
static RE_BB_SHORT: LazyLock<Regex> = re!(r"(?i)^bb\s+([0-9]+)\s+([0-9]+\.?[0-9]*)$");
static RE_COLOR: LazyLock<Regex> = re!(r"color\s*[=:]\s*(#[0-9a-fA-F]{6}|color\.[A-Za-z0-9_]+)");

const RSI_COLOR: &str = "#AB47BC";
const MACD_COLOR: &str = "#2196F3";
const BB_COLOR: &str = "#FF9800";

fn group<'t>(caps: &Captures<'t>, i: usize) -> &'t str {
    caps.get(i).map_or("", |m| m.as_str())
}

fn number(caps: &Captures<'_>, i: usize) -> Option<f64> {
    group(caps, i).parse().ok()
}

fn explicit_color(line: &str) -> Option<String> {
    RE_COLOR
        .captures(line)
        .and_then(|c| c.get(1))
        .and_then(|m| resolve_color(m.as_str()))
}

/// Parse every recognisable indicator line, in order.
///
/// Blank lines and `//` comments are skipped; anything unrecognised is dropped.
pub fn parse_indicators(script: &str) -> Vec<IndicatorDescriptor> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .filter_map(parse_line)
        .collect()
}

/// Parse a single trimmed line. The first matching form wins.
///
/// Function-call RSI, MACD and BB lines get fixed default colours, but an
/// explicit `color=` on the line replaces them. Shorthand forms carry no colour.
pub fn parse_line(line: &str) -> Option<IndicatorDescriptor> {
    if let Some(c) = RE_SMA_CALL.captures(line) {
        let period = number(&c, 1)?;
        return Some(single(IndicatorKind::Sma, period).with_color(explicit_color(line)));
    }
    if let Some(c) = RE_EMA_CALL.captures(line) {
        let period = number(&c, 1)?;
        return Some(single(IndicatorKind::Ema, period).with_color(explicit_color(line)));
    }
    if let Some(c) = RE_RSI_CALL.captures(line) {
        let period = number(&c, 1)?;
        let color = explicit_color(line).unwrap_or_else(|| RSI_COLOR.to_string());
        return Some(single(IndicatorKind::Rsi, period).with_color(Some(color)));
    }
    if let Some(c) = RE_MACD_CALL.captures(line) {
        let color = explicit_color(line).unwrap_or_else(|| MACD_COLOR.to_string());
        return Some(macd(&c)?.with_color(Some(color)));
    }
    if let Some(c) = RE_BB_CALL.captures(line) {
        let color = explicit_color(line).unwrap_or_else(|| BB_COLOR.to_string());
        return Some(bollinger(&c)?.with_color(Some(color)));
    }
    if let Some(c) = RE_SINGLE_SHORT.captures(line) {
        let kind = match group(&c, 1).to_ascii_lowercase().as_str() {
            "sma" => IndicatorKind::Sma,
            "ema" => IndicatorKind::Ema,
            _ => IndicatorKind::Rsi,
        };
        return Some(single(kind, number(&c, 2)?));
    }
    if let Some(c) = RE_MACD_SHORT.captures(line) {
        return macd(&c);
    }
    if let Some(c) = RE_BB_SHORT.captures(line) {
        return bollinger(&c);
    }
    None
}

fn single(kind: IndicatorKind, period: f64) -> IndicatorDescriptor {
    let prefix = match kind {
        IndicatorKind::Sma => "SMA",
        IndicatorKind::Ema => "EMA",
        IndicatorKind::Rsi => "RSI",
        IndicatorKind::Macd => "MACD",
        IndicatorKind::Bb => "BB",
    };
    IndicatorDescriptor::new(format!("{prefix} {period}"), kind, &[("period", period)])
}

fn macd(c: &Captures<'_>) -> Option<IndicatorDescriptor> {
    Some(IndicatorDescriptor::new(
        "MACD",
        IndicatorKind::Macd,
        &[
            ("fast", number(c, 1)?),
            ("slow", number(c, 2)?),
            ("signal", number(c, 3)?),
        ],
    ))
}

// Name keeps the literal text of both arguments ("BB 20,2.0").
fn bollinger(c: &Captures<'_>) -> Option<IndicatorDescriptor> {
    Some(IndicatorDescriptor::new(
        format!("BB {},{}", group(c, 1), group(c, 2)),
        IndicatorKind::Bb,
        &[("period", number(c, 1)?), ("stddev", number(c, 2)?)],
    ))
}
