//! Statement tokenizer
//!
//! Bracket-aware splitting of one protocol line into segments.
//! Focus: fast, allocation-light, no failure mode.

/// Split a line on `;`, except inside a `[`..`]` span.
///
/// Brackets may contain `;` freely (item and response lists). Unbalanced
/// brackets are not an error here: everything from the first unmatched `[`
/// to the end of the line counts as "inside bracket". No trimming is done;
/// callers decide what whitespace means.
pub fn split_statement(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth: usize = 0;

    for ch in line.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ';' if depth == 0 => {
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    segments.push(current);

    segments
}

/// Number of segments `split_statement` would produce.
pub fn segment_count(line: &str) -> usize {
    split_statement(line).len()
}
