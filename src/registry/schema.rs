//! Command table schema
//!
//! Types mirroring the command-table TOML files. A table file declares the
//! recognized commands, their category and their argument shape; the
//! registry turns it into a lookup map.

use serde::Deserialize;
use std::collections::HashMap;

/// Root structure of a command-table file (matches TOML).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CommandTableFile {
    pub table: TableMeta,
    pub commands: Vec<CommandSpec>,
}

/// Table metadata.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TableMeta {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Broad grouping of a command, used for merge and fix eligibility.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Slide-producing commands (instructions, timers, scales, fields).
    Content,
    /// RANDOMIZE_ON / RANDOMIZE_OFF block markers.
    Randomization,
    /// Document-level directives and control flow (STUDY_ID, LABEL, GOTO).
    Meta,
    /// Styling directives (alignment, sizes, colors).
    Style,
}

/// What a command's single argument must look like, for the style families
/// validated generically through the registry.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    /// LEFT / CENTER / RIGHT.
    Alignment,
    /// Positive number.
    Size,
    /// #RRGGBB or #AARRGGBB.
    Color,
    /// Anything goes.
    #[default]
    Freeform,
    /// Takes no argument.
    None,
}

/// One recognized command and its argument shape.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CommandSpec {
    pub name: String,
    pub category: Category,
    /// Segment count (command included) the line must have exactly.
    pub exact_segments: Option<usize>,
    /// Minimum segment count (command included).
    pub min_segments: Option<usize>,
    #[serde(default)]
    pub argument: ArgumentKind,
}

impl CommandSpec {
    /// Whether `count` segments satisfy this command's shape.
    pub fn is_complete(&self, count: usize) -> bool {
        if let Some(exact) = self.exact_segments {
            return count >= exact;
        }
        if let Some(min) = self.min_segments {
            return count >= min;
        }
        true
    }
}

impl CommandTableFile {
    /// Flatten into a name-keyed map for fast lookups.
    pub fn into_map(self) -> HashMap<String, CommandSpec> {
        self.commands
            .into_iter()
            .map(|spec| (spec.name.clone(), spec))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_toml() {
        let toml_src = r#"
            [table]
            name = "test"
            version = "1"

            [[commands]]
            name = "INSTRUCTION"
            category = "content"
            exact_segments = 4

            [[commands]]
            name = "HEADER_COLOR"
            category = "style"
            argument = "color"
        "#;

        let file: CommandTableFile = toml::from_str(toml_src).unwrap();
        assert_eq!(file.table.name, "test");
        assert_eq!(file.commands.len(), 2);
        assert_eq!(file.commands[0].exact_segments, Some(4));
        assert_eq!(file.commands[1].argument, ArgumentKind::Color);
        assert_eq!(file.commands[1].category, Category::Style);
    }

    #[test]
    fn test_is_complete_exact() {
        let spec = CommandSpec {
            name: "TIMER".to_string(),
            category: Category::Content,
            exact_segments: Some(5),
            min_segments: None,
            argument: ArgumentKind::Freeform,
        };
        assert!(!spec.is_complete(4));
        assert!(spec.is_complete(5));
        assert!(spec.is_complete(6));
    }

    #[test]
    fn test_is_complete_min() {
        let spec = CommandSpec {
            name: "SCALE".to_string(),
            category: Category::Content,
            exact_segments: None,
            min_segments: Some(2),
            argument: ArgumentKind::Freeform,
        };
        assert!(!spec.is_complete(1));
        assert!(spec.is_complete(2));
        assert!(spec.is_complete(7));
    }
}
