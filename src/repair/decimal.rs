/// Parse a quote field written with either `,` or `.` as decimal separator.
///
/// Leading whitespace is skipped; everything after it must be consumed by
/// the parse. Empty, partially numeric and non-finite inputs are `None`.
///
/// ```rust
/// # use impvol_lib::repair::parse_decimal;
/// assert_eq!(parse_decimal("178,999"), Some(178.999));
/// assert_eq!(parse_decimal("12.5x"), None);
/// ```
pub fn parse_decimal(text: &str) -> Option<f64> {
    let normalized = text.trim_start().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Whether [`parse_decimal`] accepts `text`.
pub fn is_valid_decimal(text: &str) -> bool {
    parse_decimal(text).is_some()
}
