//! Quick-fix repairs
//!
//! Each repair is a pure function over the document's lines. Applying a
//! repair twice changes nothing the second time, so an editor can offer
//! them as one-click actions without tracking state.

use crate::parser::{leading_command, split_statement};
use crate::registry::{ArgumentKind, CommandRegistry};
use serde::Serialize;

/// Placeholder text used when padding broken content commands.
pub const PLACEHOLDER_HEADER: &str = "Header";
pub const PLACEHOLDER_BODY: &str = "Body";
pub const PLACEHOLDER_CONTINUE: &str = "Continue";
pub const PLACEHOLDER_FIELD: &str = "[Field]";
pub const DEFAULT_TIMER_SECONDS: &str = "60";

/// Output of one repair pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixOutcome {
    pub lines: Vec<String>,
    pub changed: usize,
}

/// Strip trailing semicolons. A line consisting only of semicolons is left
/// alone rather than collapsed to nothing.
pub fn remove_stray_semicolons(lines: &[String]) -> FixOutcome {
    let mut changed = 0;
    let fixed = lines
        .iter()
        .map(|line| {
            let trimmed = line.trim_end();
            if !trimmed.ends_with(';') {
                return line.clone();
            }
            let stripped = trimmed.trim_end_matches(';');
            if stripped.trim().is_empty() {
                return line.clone();
            }
            changed += 1;
            stripped.to_string()
        })
        .collect();
    FixOutcome {
        lines: fixed,
        changed,
    }
}

/// Keep the first STUDY_ID, drop every later one.
pub fn remove_duplicate_study_id(lines: &[String]) -> FixOutcome {
    let mut seen = false;
    let mut changed = 0;
    let mut fixed = Vec::with_capacity(lines.len());
    for line in lines {
        if leading_command(line) == "STUDY_ID" {
            if seen {
                changed += 1;
                continue;
            }
            seen = true;
        }
        fixed.push(line.clone());
    }
    FixOutcome {
        lines: fixed,
        changed,
    }
}

/// Keep the first declaration of each label name, drop the rest.
pub fn remove_duplicate_labels(lines: &[String]) -> FixOutcome {
    let mut seen: Vec<String> = Vec::new();
    let mut changed = 0;
    let mut fixed = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(name) = label_name(line) {
            if seen.contains(&name) {
                changed += 1;
                continue;
            }
            seen.push(name);
        }
        fixed.push(line.clone());
    }
    FixOutcome {
        lines: fixed,
        changed,
    }
}

/// Synthesize a `LABEL;{target}` right after the first GOTO to each target
/// that has no declaration. Later insertions see the already-inserted
/// labels, so offsets take care of themselves.
pub fn insert_missing_labels(lines: &[String]) -> FixOutcome {
    let mut declared: Vec<String> = lines.iter().filter_map(|l| label_name(l)).collect();
    let mut changed = 0;
    let mut fixed = Vec::with_capacity(lines.len());

    for line in lines {
        fixed.push(line.clone());
        if leading_command(line) != "GOTO" {
            continue;
        }
        let target = second_segment(line);
        if target.is_empty() || declared.iter().any(|d| *d == target) {
            continue;
        }
        fixed.push(format!("LABEL;{target}"));
        declared.push(target);
        changed += 1;
    }

    FixOutcome {
        lines: fixed,
        changed,
    }
}

/// Repair TIMER lines to exactly 5 segments, substituting placeholder text
/// and a 60-second duration for anything missing or negative.
pub fn normalize_timers(lines: &[String]) -> FixOutcome {
    let mut changed = 0;
    let fixed = lines
        .iter()
        .map(|line| {
            if leading_command(line) != "TIMER" {
                return line.clone();
            }
            let segments = trimmed_segments(line);
            let header = segment_or(&segments, 1, PLACEHOLDER_HEADER);
            let body = segment_or(&segments, 2, PLACEHOLDER_BODY);
            let seconds = match segments.get(3).map(String::as_str) {
                Some(raw) => match raw.parse::<i64>() {
                    Ok(v) if v >= 0 => raw.to_string(),
                    _ => DEFAULT_TIMER_SECONDS.to_string(),
                },
                None => DEFAULT_TIMER_SECONDS.to_string(),
            };
            let cont = segment_or(&segments, 4, PLACEHOLDER_CONTINUE);
            let repaired = format!("TIMER;{header};{body};{seconds};{cont}");
            if repaired != *line {
                changed += 1;
            }
            repaired
        })
        .collect();
    FixOutcome {
        lines: fixed,
        changed,
    }
}

/// Normalize color values on color-style commands: expand #RGB/#ARGB
/// shorthands, resolve a small named set, uppercase valid long forms.
/// Unrecognized values stay untouched for the validator to flag.
pub fn normalize_colors(lines: &[String], registry: &CommandRegistry) -> FixOutcome {
    let mut changed = 0;
    let fixed = lines
        .iter()
        .map(|line| {
            let command = leading_command(line);
            if registry.argument_kind(&command) != ArgumentKind::Color {
                return line.clone();
            }
            let segments = trimmed_segments(line);
            let value = match segments.get(1) {
                Some(v) if !v.is_empty() => v,
                _ => return line.clone(),
            };
            let normalized = match normalize_color_value(value) {
                Some(v) if v != *value => v,
                _ => return line.clone(),
            };
            changed += 1;
            let mut parts = segments;
            parts[1] = normalized;
            parts.join(";")
        })
        .collect();
    FixOutcome {
        lines: fixed,
        changed,
    }
}

/// Pad broken content commands into a minimally valid form using the same
/// placeholders as the TIMER repair.
pub fn normalize_content(lines: &[String]) -> FixOutcome {
    let mut changed = 0;
    let fixed = lines
        .iter()
        .map(|line| {
            let command = leading_command(line);
            let repaired = match command.as_str() {
                "INSTRUCTION" => repair_instruction(line),
                "SCALE" | "SCALE[RANDOMIZED]" => repair_scale(line, &command),
                "INPUTFIELD" | "INPUTFIELD[RANDOMIZED]" => repair_inputfield(line, &command),
                _ => return line.clone(),
            };
            if repaired != *line {
                changed += 1;
            }
            repaired
        })
        .collect();
    FixOutcome {
        lines: fixed,
        changed,
    }
}

fn repair_instruction(line: &str) -> String {
    let segments = trimmed_segments(line);
    if segments.len() > 4 {
        // Too many segments is not repairable by padding; leave it for the
        // validator to report.
        return line.to_string();
    }
    let header = segment_or(&segments, 1, PLACEHOLDER_HEADER);
    let body = segment_or(&segments, 2, PLACEHOLDER_BODY);
    let cont = segment_or(&segments, 3, PLACEHOLDER_CONTINUE);
    format!("INSTRUCTION;{header};{body};{cont}")
}

fn repair_scale(line: &str, command: &str) -> String {
    let segments = trimmed_segments(line);
    if segments.len() >= 2 && !segments[1].is_empty() {
        return line.to_string();
    }
    let header = segment_or(&segments, 1, PLACEHOLDER_HEADER);
    let mut parts = vec![command.to_string(), header];
    parts.extend(segments.into_iter().skip(2));
    parts.join(";")
}

fn repair_inputfield(line: &str, command: &str) -> String {
    let segments = trimmed_segments(line);
    if segments.len() >= 4
        && !segments[1].is_empty()
        && !segments[2].is_empty()
        && !segments[3].is_empty()
        && segments[3] != "[]"
    {
        return line.to_string();
    }
    let header = segment_or(&segments, 1, PLACEHOLDER_HEADER);
    let body = segment_or(&segments, 2, PLACEHOLDER_BODY);
    let fields = match segments.get(3) {
        Some(v) if !v.is_empty() && v != "[]" => v.clone(),
        _ => PLACEHOLDER_FIELD.to_string(),
    };
    let mut parts = vec![command.to_string(), header, body, fields];
    parts.extend(segments.into_iter().skip(4));
    parts.join(";")
}

fn normalize_color_value(value: &str) -> Option<String> {
    let named = match value.to_ascii_lowercase().as_str() {
        "red" => Some("#FF0000"),
        "green" => Some("#00FF00"),
        "blue" => Some("#0000FF"),
        "black" => Some("#000000"),
        "white" => Some("#FFFFFF"),
        "gray" | "grey" => Some("#808080"),
        _ => None,
    };
    if let Some(hex) = named {
        return Some(hex.to_string());
    }

    let digits = value.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        // #RGB and #ARGB shorthands double each digit.
        3 | 4 => {
            let mut expanded = String::with_capacity(1 + digits.len() * 2);
            expanded.push('#');
            for c in digits.chars() {
                let upper = c.to_ascii_uppercase();
                expanded.push(upper);
                expanded.push(upper);
            }
            Some(expanded)
        }
        6 | 8 => Some(format!("#{}", digits.to_ascii_uppercase())),
        _ => None,
    }
}

fn label_name(line: &str) -> Option<String> {
    if leading_command(line) != "LABEL" {
        return None;
    }
    let name = second_segment(line);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn second_segment(line: &str) -> String {
    split_statement(line.trim())
        .get(1)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn trimmed_segments(line: &str) -> Vec<String> {
    split_statement(line.trim().trim_end_matches(';'))
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect()
}

fn segment_or(segments: &[String], index: usize, placeholder: &str) -> String {
    match segments.get(index) {
        Some(v) if !v.is_empty() => v.clone(),
        _ => placeholder.to_string(),
    }
}
