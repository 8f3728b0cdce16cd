//! Validation engine
//!
//! Per-line linting of a protocol script. Runs on merged (not transformed)
//! lines so every finding points at the line the author actually wrote.
//! Malformed content is expected end-user input: every rule reports and
//! continues, nothing here ever panics on script text.

use crate::parser::{merge_numbered, split_statement, RawLine, Statement};
use crate::registry::{ArgumentKind, Category, CommandRegistry};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

/// Maximum TIMER duration (seconds) before the validator asks the author to
/// double-check the value.
pub const TIMER_WARN_SECONDS: i64 = 3600;

/// Maximum style size before a warning is raised.
pub const SIZE_WARN_LIMIT: f64 = 200.0;

/// One finding per logical line. Empty `error`/`warning` strings mean no
/// issue of that severity; multiple fragments are joined with `"; "`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line_number: usize,
    pub raw: String,
    pub command: String,
    pub error: String,
    pub warning: String,
}

impl Diagnostic {
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn has_warning(&self) -> bool {
        !self.warning.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_error() && !self.has_warning()
    }
}

/// Validate a whole script, one diagnostic per logical line plus, when a
/// randomization block is left open, one synthetic `<EOF>` entry.
pub fn validate_document(text: &str, registry: &CommandRegistry) -> Vec<Diagnostic> {
    let merged = merge_numbered(text, registry);
    let labels = build_label_table(&merged);
    let rules = Rules::new(registry, labels);
    let mut diagnostics = Vec::with_capacity(merged.len() + 1);

    let mut state = ScanState::default();
    for raw in &merged {
        diagnostics.push(rules.check_line(raw, &mut state));
    }

    if state.randomize_depth > 0 {
        diagnostics.push(Diagnostic {
            line_number: text.lines().count() + 1,
            raw: "<EOF>".to_string(),
            command: String::new(),
            error: "RANDOMIZE_ON not closed by matching RANDOMIZE_OFF".to_string(),
            warning: String::new(),
        });
    }

    diagnostics
}

/// Label name -> line numbers declaring it, in document order.
pub type LabelTable = HashMap<String, Vec<usize>>;

/// Build the label table over merged lines. More than one entry for a name
/// is the duplicate-label condition.
pub fn build_label_table(merged: &[RawLine]) -> LabelTable {
    let mut table: LabelTable = HashMap::new();
    for raw in merged {
        let stmt = Statement::parse(raw.line_number, &raw.text);
        if stmt.command == "LABEL" {
            if let Some(name) = stmt.arguments.first() {
                if !name.is_empty() {
                    table
                        .entry(name.clone())
                        .or_default()
                        .push(raw.line_number);
                }
            }
        }
    }
    table
}

#[derive(Default)]
struct ScanState {
    randomize_depth: usize,
    study_id_seen: bool,
}

/// Per-line accumulator; fragments join with `"; "` in detection order.
#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

struct Rules<'a> {
    registry: &'a CommandRegistry,
    labels: LabelTable,
    color_re: Option<Regex>,
}

impl<'a> Rules<'a> {
    fn new(registry: &'a CommandRegistry, labels: LabelTable) -> Self {
        Self {
            registry,
            labels,
            // The pattern is static; a compile failure would only mean a
            // broken build, in which case color checks are skipped.
            color_re: Regex::new(r"^#(?:[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").ok(),
        }
    }

    fn check_line(&self, raw: &RawLine, state: &mut ScanState) -> Diagnostic {
        let stmt = Statement::parse(raw.line_number, &raw.text);
        let mut findings = Findings::default();

        if !stmt.is_blank() && !stmt.is_comment() {
            self.apply_rules(&stmt, state, &mut findings);
        }

        Diagnostic {
            line_number: raw.line_number,
            raw: raw.text.clone(),
            command: stmt.command,
            error: findings.errors.join("; "),
            warning: findings.warnings.join("; "),
        }
    }

    fn apply_rules(&self, stmt: &Statement, state: &mut ScanState, findings: &mut Findings) {
        let trimmed = stmt.raw_text.trim();
        if trimmed.ends_with(';') {
            findings.error("stray semicolon at end of line");
        }

        // Shape checks run on the line with stray semicolons discounted, so
        // one trailing `;` does not also count as a phantom empty segment.
        let logical = trimmed.trim_end_matches(';');
        let segments: Vec<String> = split_statement(logical)
            .into_iter()
            .map(|s| s.trim().to_string())
            .collect();

        if stmt.command.is_empty() {
            findings.error("missing command name");
            return;
        }

        match stmt.command.as_str() {
            "RANDOMIZE_ON" => {
                if state.randomize_depth > 0 {
                    findings.error("RANDOMIZE_ON inside an open randomization block");
                } else {
                    state.randomize_depth += 1;
                }
                return;
            }
            "RANDOMIZE_OFF" => {
                if state.randomize_depth == 0 {
                    findings.error("RANDOMIZE_OFF without matching RANDOMIZE_ON");
                } else {
                    state.randomize_depth -= 1;
                }
                return;
            }
            _ => {}
        }

        if !self.registry.is_recognized(&stmt.command) {
            findings.error(format!("unrecognized command '{}'", stmt.command));
            return;
        }

        match stmt.command.as_str() {
            "STUDY_ID" => self.check_study_id(&segments, state, findings),
            "LABEL" => self.check_label(stmt, findings),
            "GOTO" => self.check_goto(stmt, findings),
            "INSTRUCTION" => self.check_instruction(&segments, findings),
            "TIMER" => self.check_timer(&segments, findings),
            "SCALE" | "SCALE[RANDOMIZED]" | "MULTISCALE" | "RANDOMIZED_MULTISCALE" => {
                self.check_min_segments(&stmt.command, &segments, findings)
            }
            "INPUTFIELD" | "INPUTFIELD[RANDOMIZED]" => self.check_inputfield(stmt, &segments, findings),
            _ => {
                if self.registry.category(&stmt.command) == Some(Category::Style) {
                    self.check_style(&stmt.command, &segments, findings);
                }
            }
        }
    }

    fn check_study_id(&self, segments: &[String], state: &mut ScanState, findings: &mut Findings) {
        if state.study_id_seen {
            findings.error("duplicate STUDY_ID");
            return;
        }
        state.study_id_seen = true;
        let value = segments.get(1).map(String::as_str).unwrap_or("");
        if value.is_empty() {
            findings.error("STUDY_ID missing required value");
        }
    }

    fn check_label(&self, stmt: &Statement, findings: &mut Findings) {
        let name = stmt.arguments.first().map(String::as_str).unwrap_or("");
        if name.is_empty() {
            findings.error("LABEL requires a name");
            return;
        }
        if let Some(occurrences) = self.labels.get(name) {
            if occurrences.len() > 1 {
                let others: Vec<String> = occurrences
                    .iter()
                    .filter(|n| **n != stmt.line_number)
                    .map(|n| n.to_string())
                    .collect();
                findings.error(format!(
                    "duplicate label '{}' (also declared on line {})",
                    name,
                    others.join(", ")
                ));
            }
        }
    }

    fn check_goto(&self, stmt: &Statement, findings: &mut Findings) {
        let target = stmt.arguments.first().map(String::as_str).unwrap_or("");
        if target.is_empty() {
            findings.error("GOTO missing target label");
        } else if !self.labels.contains_key(target) {
            findings.error(format!("GOTO target '{}' has no matching LABEL", target));
        }
    }

    fn check_instruction(&self, segments: &[String], findings: &mut Findings) {
        if segments.len() != 4 {
            findings.error("INSTRUCTION must contain exactly 3 semicolons");
        }
    }

    fn check_timer(&self, segments: &[String], findings: &mut Findings) {
        if segments.len() != 5 {
            findings.error("TIMER must have exactly 5 segments");
            return;
        }
        match segments[3].parse::<i64>() {
            Ok(seconds) if seconds >= 0 => {
                if seconds > TIMER_WARN_SECONDS {
                    findings.warning(format!(
                        "TIMER duration {} exceeds {} seconds; double-check the value",
                        seconds, TIMER_WARN_SECONDS
                    ));
                }
            }
            _ => findings.error("TIMER 4th segment must be a non-negative integer"),
        }
    }

    fn check_min_segments(&self, command: &str, segments: &[String], findings: &mut Findings) {
        if let Some(min) = self.registry.get(command).and_then(|s| s.min_segments) {
            if segments.len() < min {
                findings.error(format!("{} requires at least {} segments", command, min));
            }
        }
    }

    fn check_inputfield(&self, stmt: &Statement, segments: &[String], findings: &mut Findings) {
        if segments.len() < 4 {
            findings.error(format!("{} requires at least 4 segments", stmt.command));
            return;
        }
        let field_segment = segments[3].as_str();
        if field_segment.is_empty() || field_segment == "[]" {
            findings.error("empty field definition");
            return;
        }
        if stmt.command == "INPUTFIELD[RANDOMIZED]" {
            let fields = parse_field_tokens(field_segment);
            if fields.len() < 2 {
                findings.warning(
                    "randomized INPUTFIELD with fewer than 2 fields has nothing to shuffle",
                );
            }
        }
    }

    fn check_style(&self, command: &str, segments: &[String], findings: &mut Findings) {
        let value = segments.get(1).map(String::as_str).unwrap_or("");
        if value.is_empty() {
            findings.error(format!("{} missing value", command));
            return;
        }
        if segments.len() > 2 {
            findings.error(format!("{} takes a single value", command));
        }

        match self.registry.argument_kind(command) {
            ArgumentKind::Alignment => {
                let upper = value.to_uppercase();
                if !matches!(upper.as_str(), "LEFT" | "CENTER" | "RIGHT") {
                    findings.error(format!(
                        "{} must be one of LEFT, CENTER, RIGHT (got '{}')",
                        command, value
                    ));
                }
            }
            ArgumentKind::Size => match value.parse::<f64>() {
                Ok(size) if size > 0.0 => {
                    if size > SIZE_WARN_LIMIT {
                        findings.warning(format!(
                            "{} value {} is unusually large (over {})",
                            command, value, SIZE_WARN_LIMIT
                        ));
                    }
                }
                _ => findings.error(format!("{} must be a positive number (got '{}')", command, value)),
            },
            ArgumentKind::Color => {
                let valid = self
                    .color_re
                    .as_ref()
                    .map(|re| re.is_match(value))
                    .unwrap_or(true);
                if !valid {
                    findings.error(format!(
                        "{} must be #RRGGBB or #AARRGGBB (got '{}')",
                        command, value
                    ));
                }
            }
            ArgumentKind::Freeform | ArgumentKind::None => {}
        }
    }
}

/// Split a field-definition segment like `[Name;Age;Mood]` into its tokens.
pub fn parse_field_tokens(segment: &str) -> Vec<String> {
    let inner = segment
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(segment.trim());
    inner
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
