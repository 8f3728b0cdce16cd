//! Line merger
//!
//! Recovers hand-wrapped scripts where an author broke one long statement
//! across several physical lines, ending each fragment with `;`. Only the
//! multi-segment content commands may span lines; everything else passes
//! through untouched.

use crate::parser::statement::{leading_command, RawLine};
use crate::parser::tokenizer::segment_count;
use crate::registry::CommandRegistry;

enum MergeState {
    Idle,
    Merging { start: usize, buffer: String },
}

/// Merge continuation lines into logical lines, keeping the first physical
/// line number of each logical line (diagnostics must point at the line the
/// author sees).
pub fn merge_numbered(text: &str, registry: &CommandRegistry) -> Vec<RawLine> {
    let mut output = Vec::new();
    let mut state = MergeState::Idle;

    for (idx, line) in text.lines().enumerate() {
        let number = idx + 1;
        let trimmed = line.trim_end();

        state = match state {
            MergeState::Idle => {
                if trimmed.trim().is_empty() {
                    output.push(RawLine::new(number, line));
                    MergeState::Idle
                } else if opens_merge(trimmed, registry) {
                    MergeState::Merging {
                        start: number,
                        buffer: strip_trailing_semicolon(trimmed).to_string(),
                    }
                } else {
                    output.push(RawLine::new(number, line));
                    MergeState::Idle
                }
            }
            MergeState::Merging { start, mut buffer } => {
                // Blank lines inside a merge contribute nothing.
                if trimmed.trim().is_empty() {
                    MergeState::Merging { start, buffer }
                } else {
                    let continues = trimmed.ends_with(';');
                    buffer.push(';');
                    buffer.push_str(strip_trailing_semicolon(trimmed));
                    if continues {
                        MergeState::Merging { start, buffer }
                    } else {
                        output.push(RawLine::new(start, buffer));
                        MergeState::Idle
                    }
                }
            }
        };
    }

    // End of input mid-merge: flush whatever is buffered, best-effort.
    if let MergeState::Merging { start, buffer } = state {
        output.push(RawLine::new(start, buffer));
    }

    output
}

/// Merge continuation lines, returning just the logical line texts.
pub fn merge_lines(text: &str, registry: &CommandRegistry) -> Vec<String> {
    merge_numbered(text, registry)
        .into_iter()
        .map(|raw| raw.text)
        .collect()
}

/// A line opens a merge when its command is allowed to span lines and it is
/// either still missing segments or carries a trailing `;`.
fn opens_merge(trimmed: &str, registry: &CommandRegistry) -> bool {
    let command = leading_command(trimmed);
    if !registry.is_mergeable(&command) {
        return false;
    }
    if trimmed.ends_with(';') {
        return true;
    }
    match registry.get(&command) {
        Some(spec) => !spec.is_complete(segment_count(trimmed)),
        None => false,
    }
}

fn strip_trailing_semicolon(line: &str) -> &str {
    line.strip_suffix(';').unwrap_or(line)
}
