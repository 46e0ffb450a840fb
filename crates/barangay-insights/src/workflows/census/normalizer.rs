/// Strip invisible characters and collapse internal whitespace; case is preserved.
pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Key used to compare barangay names: normalized and lower-cased.
pub(crate) fn matching_key(value: &str) -> String {
    normalize_name(value).to_lowercase()
}

pub fn same_barangay(left: &str, right: &str) -> bool {
    matching_key(left) == matching_key(right)
}

/// Parse a number the way census exports write them: optional thousands separators and
/// currency sign. Anything unparseable is `None`.
pub(crate) fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ',' | '₱' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|amount| amount.is_finite())
}
