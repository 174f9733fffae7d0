//! Named colour tokens accepted in `color=` / `color:` annotations.

const NAMED_COLORS: &[(&str, &str)] = &[
    ("color.red", "#EF5350"),
    ("color.green", "#26A69A"),
    ("color.blue", "#2196F3"),
    ("color.yellow", "#FFEB3B"),
    ("color.orange", "#FF9800"),
    ("color.purple", "#AB47BC"),
    ("color.white", "#FFFFFF"),
    ("color.aqua", "#00BCD4"),
    ("color.lime", "#CDDC39"),
    ("color.fuchsia", "#E040FB"),
];

/// Resolve a colour token: hex passes through, `color.<name>` is looked up.
pub fn resolve_color(token: &str) -> Option<String> {
    if token.starts_with('#') {
        return Some(token.to_string());
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, hex)| hex.to_string())
}
