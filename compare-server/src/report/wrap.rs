//! Greedy text wrapping.

/// Wrap `text` into lines of at most `width` characters.
///
/// Words are separated by whitespace and joined with single spaces.
/// A word longer than `width` is broken across lines. Blank input
/// yields no lines. A `width` of zero is treated as one.
///
/// ```
/// use compare_server::report::wrap_text;
///
/// let lines = wrap_text("Links abbiegen auf Hauptstrasse", 15);
/// assert_eq!(lines, vec!["Links abbiegen", "auf", "Hauptstrasse"]);
/// ```
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let rest_len = rest.chars().count();
            let needed = if current_len == 0 {
                rest_len
            } else {
                current_len + 1 + rest_len
            };

            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(rest);
                current_len += rest_len;
                break;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }

            // Too long for a line of its own.
            let split = rest
                .char_indices()
                .nth(width)
                .map_or(rest.len(), |(i, _)| i);
            lines.push(rest[..split].to_string());
            rest = &rest[split..];
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}
