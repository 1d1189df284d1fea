//! Top-level splitting of rule text.
//!
//! Bodies, argument lists, and choice options are all separated by a single
//! character that may also appear nested inside terms or quoted strings.
//! [`split_top_level`] is the one scan every consumer goes through.

/// Splits `text` on `separator` wherever it occurs at nesting depth 0 and
/// outside any quoted string.
///
/// - `(`, `{`, and `[` open a nesting level; `)`, `}`, and `]` close one
/// - `"` and `'` open a quote that only the same character closes
/// - pieces are trimmed and empty pieces are dropped
#[must_use]
pub fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: isize = 0;
    let mut quote: Option<char> = None;

    for ch in text.chars() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            current.push(ch);
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '(' | '{' | '[' => {
                depth += 1;
                current.push(ch);
            }
            ')' | '}' | ']' => {
                depth -= 1;
                current.push(ch);
            }
            c if c == separator && depth == 0 => {
                push_trimmed(&mut parts, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    push_trimmed(&mut parts, &current);
    parts
}

fn push_trimmed(parts: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        parts.push(piece.to_string());
    }
}

/// Trims whitespace and every trailing `.` terminator.
#[must_use]
pub fn strip_terminator(text: &str) -> &str {
    text.trim().trim_end_matches('.').trim_end()
}
