/// Placeholder for values the backend did not supply.
pub const PLACEHOLDER: &str = "—";

const ELLIPSIS: &str = "...";

/// Keep the first `max_chars` characters, adding `...` only when something
/// was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Scores print without a fractional part when they are whole.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}
