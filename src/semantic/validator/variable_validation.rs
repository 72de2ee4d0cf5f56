//! Variable validation for MATCH statements.
//!
//! Bound variables are recovered from the raw pattern text with a light scan,
//! not a structural parse: every identifier that directly follows an opening
//! bracket (optionally after whitespace) counts as bound.

use std::collections::HashSet;

/// Extracts the variables bound by `pattern`, deduplicated in first-seen order.
pub fn extract_variables(pattern: &str) -> Vec<String> {
    let bytes = pattern.as_bytes();
    let mut seen = HashSet::new();
    let mut variables = Vec::new();

    let mut idx = 0;
    while idx < bytes.len() {
        if !matches!(bytes[idx], b'(' | b'[' | b'{') {
            idx += 1;
            continue;
        }
        idx += 1;
        while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
            idx += 1;
        }
        let start = idx;
        if idx < bytes.len() && is_ident_start(bytes[idx]) {
            idx += 1;
            while idx < bytes.len() && is_ident_continue(bytes[idx]) {
                idx += 1;
            }
            let name = &pattern[start..idx];
            if seen.insert(name) {
                variables.push(name.to_string());
            }
        }
    }
    variables
}

/// Returns the projection items that reference names outside `known`.
///
/// Each item is reduced to a candidate: the text before the first space or
/// parenthesis, with surrounding backticks and double quotes removed. A
/// candidate containing `.` or `(` is an expression and always resolves.
/// The literal `*` is skipped. More than one result comes back sorted.
pub fn unresolved_variables(known: &[String], projections: &[String]) -> Vec<String> {
    let known: HashSet<&str> = known.iter().map(String::as_str).collect();
    let mut missing: Vec<String> = projections
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty() && *item != "*")
        .map(candidate_name)
        .filter(|candidate| {
            !known.contains(candidate) && !candidate.contains('.') && !candidate.contains('(')
        })
        .map(str::to_string)
        .collect();
    if missing.len() > 1 {
        missing.sort();
    }
    missing
}

fn candidate_name(item: &str) -> &str {
    let head = match item.find([' ', '(', ')']) {
        Some(idx) if idx > 0 => &item[..idx],
        _ => item,
    };
    head.trim_matches(['`', '"'])
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
