//! Small string helpers shared by the stores and the domain rules.

/// Escape `%`, `_` and `\` so a value can be used as a literal `LIKE`/`ILIKE`
/// pattern (Postgres default escape character is `\`).
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Trim an optional free-text field, mapping blank input to `None`.
pub fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Lower-case form used for case-insensitive comparisons.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}
