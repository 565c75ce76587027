//! Dotted key paths shared by the JSON and TOML extractors.

/// Split a dotted key into its segments.
///
/// Segments may be quoted with `"` or `'` to contain dots, as in TOML:
/// `a."b.c".d` has the three segments `a`, `b.c` and `d`. Returns `None` for
/// an empty segment or an unterminated quote.
pub fn split_dotted(key: &str) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    let mut chars = key.trim().chars().peekable();

    loop {
        let mut segment = String::new();
        match chars.peek() {
            Some(&quote @ ('"' | '\'')) => {
                chars.next();
                loop {
                    match chars.next() {
                        Some(c) if c == quote => break,
                        Some(c) => segment.push(c),
                        None => return None,
                    }
                }
            }
            _ => {
                while let Some(&c) = chars.peek() {
                    if c == '.' {
                        break;
                    }
                    segment.push(c);
                    chars.next();
                }
                segment = segment.trim().to_owned();
                if segment.is_empty() {
                    return None;
                }
            }
        }
        segments.push(segment);

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => return Some(segments),
            Some('.') => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            Some(_) => return None,
        }
    }
}
