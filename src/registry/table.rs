//! Command Registry
//!
//! Single source of truth for what counts as a recognized command.
//! Constructed once at startup and shared by reference between the
//! validator and the quick-fix engine so the two never disagree.

use super::schema::{ArgumentKind, Category, CommandSpec, CommandTableFile};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// In-memory command registry, read-only after construction.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandSpec>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_builtin_commands()
    }
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Build the registry from the embedded core command table.
    pub fn with_builtin_commands() -> Self {
        let embedded = include_str!("../../resources/commands/core.protocol-commands.toml");

        match toml::from_str::<CommandTableFile>(embedded) {
            Ok(file) => Self {
                commands: file.into_map(),
            },
            Err(e) => {
                // Fallback keeps the engine usable if the embedded table is
                // ever broken by an edit.
                log::warn!("failed to parse embedded command table: {e}; using minimal fallback");
                Self::minimal_fallback()
            }
        }
    }

    /// Extend the registry from a command-table TOML file on disk.
    /// Entries with a name already present override the existing spec.
    pub fn add_commands_from_file(&mut self, path: &Path) -> Result<usize> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading command table {}", path.display()))?;
        let file: CommandTableFile = toml::from_str(&text)
            .with_context(|| format!("parsing command table {}", path.display()))?;

        let added = file.commands.len();
        self.commands.extend(file.into_map());
        log::debug!("loaded {added} commands from {}", path.display());
        Ok(added)
    }

    pub fn is_recognized(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn category(&self, name: &str) -> Option<Category> {
        self.commands.get(name).map(|spec| spec.category)
    }

    pub fn argument_kind(&self, name: &str) -> ArgumentKind {
        self.commands
            .get(name)
            .map(|spec| spec.argument)
            .unwrap_or(ArgumentKind::Freeform)
    }

    /// Content commands are the only ones allowed to span physical lines.
    pub fn is_mergeable(&self, name: &str) -> bool {
        self.category(name) == Some(Category::Content)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn minimal_fallback() -> Self {
        let mut commands = HashMap::new();
        for (name, exact, min) in [
            ("INSTRUCTION", Some(4), None),
            ("TIMER", Some(5), None),
            ("SCALE", None, Some(2)),
            ("INPUTFIELD", None, Some(4)),
        ] {
            commands.insert(
                name.to_string(),
                CommandSpec {
                    name: name.to_string(),
                    category: Category::Content,
                    exact_segments: exact,
                    min_segments: min,
                    argument: ArgumentKind::Freeform,
                },
            );
        }
        for name in ["STUDY_ID", "LABEL", "GOTO"] {
            commands.insert(
                name.to_string(),
                CommandSpec {
                    name: name.to_string(),
                    category: Category::Meta,
                    exact_segments: None,
                    min_segments: None,
                    argument: ArgumentKind::Freeform,
                },
            );
        }
        for name in ["RANDOMIZE_ON", "RANDOMIZE_OFF"] {
            commands.insert(
                name.to_string(),
                CommandSpec {
                    name: name.to_string(),
                    category: Category::Randomization,
                    exact_segments: Some(1),
                    min_segments: None,
                    argument: ArgumentKind::None,
                },
            );
        }
        Self { commands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_loads() {
        let registry = CommandRegistry::with_builtin_commands();
        assert!(registry.is_recognized("INSTRUCTION"));
        assert!(registry.is_recognized("TIMER"));
        assert!(registry.is_recognized("SCALE[RANDOMIZED]"));
        assert!(registry.is_recognized("RANDOMIZED_MULTISCALE"));
        assert!(registry.is_recognized("BACKGROUND_COLOR"));
        assert!(!registry.is_recognized("TELEPORT"));
    }

    #[test]
    fn test_builtin_shapes() {
        let registry = CommandRegistry::with_builtin_commands();
        assert_eq!(registry.get("INSTRUCTION").unwrap().exact_segments, Some(4));
        assert_eq!(registry.get("TIMER").unwrap().exact_segments, Some(5));
        assert_eq!(registry.get("SCALE").unwrap().min_segments, Some(2));
        assert_eq!(registry.get("INPUTFIELD").unwrap().min_segments, Some(4));
    }

    #[test]
    fn test_argument_kinds() {
        let registry = CommandRegistry::with_builtin_commands();
        assert_eq!(
            registry.argument_kind("HEADER_ALIGNMENT"),
            ArgumentKind::Alignment
        );
        assert_eq!(registry.argument_kind("BODY_SIZE"), ArgumentKind::Size);
        assert_eq!(registry.argument_kind("HEADER_COLOR"), ArgumentKind::Color);
        assert_eq!(registry.argument_kind("LABEL"), ArgumentKind::Freeform);
    }

    #[test]
    fn test_mergeable_is_content_only() {
        let registry = CommandRegistry::with_builtin_commands();
        assert!(registry.is_mergeable("INPUTFIELD"));
        assert!(registry.is_mergeable("MULTISCALE"));
        assert!(!registry.is_mergeable("GOTO"));
        assert!(!registry.is_mergeable("HEADER_COLOR"));
        assert!(!registry.is_mergeable("RANDOMIZE_ON"));
    }

    #[test]
    fn test_extension_override() {
        let mut registry = CommandRegistry::with_builtin_commands();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.toml");
        std::fs::write(
            &path,
            r#"
                [table]
                name = "extra"

                [[commands]]
                name = "VIDEO"
                category = "content"
                min_segments = 2
            "#,
        )
        .unwrap();

        let added = registry.add_commands_from_file(&path).unwrap();
        assert_eq!(added, 1);
        assert!(registry.is_recognized("VIDEO"));
    }
}
