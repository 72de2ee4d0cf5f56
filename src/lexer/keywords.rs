//! Keyword recognition for statement classification.
//!
//! Keywords are case-insensitive.

/// Leading keywords that select a dedicated statement shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKeyword {
    Use,
    Match,
}

/// Keywords whose commands modify graph data or structure.
pub const WRITE_KEYWORDS: [&str; 7] = [
    "INSERT", "UPDATE", "DELETE", "MERGE", "CREATE", "DROP", "ASSERT",
];

/// Looks up a statement keyword by name (case-insensitive).
pub fn lookup_keyword(name: &str) -> Option<StatementKeyword> {
    match name.to_ascii_uppercase().as_str() {
        "USE" => Some(StatementKeyword::Use),
        "MATCH" => Some(StatementKeyword::Match),
        _ => None,
    }
}

/// Returns true if a command with this keyword requires write permission.
pub fn is_write_keyword(name: &str) -> bool {
    WRITE_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(name))
}

/// Returns true for the optional `GRAPH` word in `USE GRAPH <name>`.
pub fn is_graph_keyword(word: &str) -> bool {
    word.eq_ignore_ascii_case("GRAPH")
}
