//! Top-level comma splitting for RETURN projections.

/// Splits `projection` at commas that are outside quotes and brackets.
///
/// Quotes toggle verbatim (no escape handling) and bracket depth is tracked
/// without matching bracket kinds. Pieces are trimmed and empty pieces are
/// dropped.
pub fn split_projection(projection: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut piece_start = 0;

    for (idx, ch) in projection.char_indices() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_piece(&mut parts, &projection[piece_start..idx]);
                piece_start = idx + 1;
            }
            _ => {}
        }
    }
    push_piece(&mut parts, &projection[piece_start..]);
    parts
}

fn push_piece(parts: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        parts.push(piece.to_string());
    }
}
