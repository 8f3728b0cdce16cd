//! Statement model
//!
//! Minimal parsed representation of one logical protocol line.
//! No validation logic here, pure data derivation.

use crate::parser::tokenizer::split_statement;

/// One physical or logical line paired with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub line_number: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
        }
    }
}

/// A parsed statement: command name plus ordered arguments.
///
/// `command` is the uppercased first segment; it is empty for blank lines
/// and for `//` comment lines. Statements are never mutated, they are
/// re-derived from the raw text on every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line_number: usize,
    pub raw_text: String,
    pub command: String,
    pub arguments: Vec<String>,
}

impl Statement {
    /// Derive a statement from one logical line.
    pub fn parse(line_number: usize, text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            return Self {
                line_number,
                raw_text: text.to_string(),
                command: String::new(),
                arguments: Vec::new(),
            };
        }

        let segments = split_statement(trimmed);
        let command = segments
            .first()
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_default();
        let arguments = segments
            .iter()
            .skip(1)
            .map(|s| s.trim().to_string())
            .collect();

        Self {
            line_number,
            raw_text: text.to_string(),
            command,
            arguments,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }

    pub fn is_comment(&self) -> bool {
        self.raw_text.trim_start().starts_with("//")
    }
}

/// Extract the uppercased first token of a line, without full parsing.
pub fn leading_command(line: &str) -> String {
    let trimmed = line.trim();
    let head = trimmed.split(';').next().unwrap_or("");
    head.trim().to_uppercase()
}
