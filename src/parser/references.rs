//! Graph reference normalization.

use smol_str::SmolStr;

/// Normalizes a raw graph reference.
///
/// A value wrapped in a matching pair of single or double quotes has the
/// quotes stripped verbatim, with no escape processing. Otherwise every
/// character must be a letter, an ASCII digit, an underscore or a hyphen.
/// Returns `None` when the reference is empty or invalid.
pub fn normalize_identifier(raw: &str) -> Option<SmolStr> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            let inner = &raw[1..raw.len() - 1];
            return (!inner.is_empty()).then(|| SmolStr::new(inner));
        }
    }

    raw.chars()
        .all(|ch| is_letter(ch) || ch.is_ascii_digit() || ch == '_' || ch == '-')
        .then(|| SmolStr::new(raw))
}

// Letter-number characters such as Roman numerals are alphabetic and numeric.
fn is_letter(ch: char) -> bool {
    ch.is_alphabetic() && !ch.is_numeric()
}
