//! Configuration management for the protoscript CLI.
//!
//! Handles:
//! - Command-line argument parsing
//! - Locating extension command-table files

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::registry::CommandRegistry;

/// Command-line arguments for the protoscript tool
#[derive(Debug, Parser)]
#[command(name = "protoscript")]
#[command(about = "Lint, repair and expand behavioral-study protocol scripts")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Additional command-table TOML file, loaded on top of the built-ins
    #[arg(long, global = true, help = "Extra command-table TOML file")]
    pub commands_file: Option<PathBuf>,

    /// Log level for diagnostics on stderr
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a script and print per-line findings
    Validate {
        script: PathBuf,
        /// Emit diagnostics as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Expand a script into the flat statement sequence the runner executes
    Transform {
        script: PathBuf,
        /// Seed for randomization blocks; a fixed seed reproduces the order
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Write the expanded sequence to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Apply the safe auto-fix pass
    Fix {
        script: PathBuf,
        /// Rewrite the script file instead of printing the repaired text
        #[arg(long)]
        in_place: bool,
        /// Emit the fix report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Extension command-table files, in load order
    pub command_files: Vec<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut command_files = Vec::new();

        if let Some(custom) = &args.commands_file {
            command_files.push(custom.clone());
        }

        // Pick up any tables from the user config directory.
        if let Some(config_dir) = dirs::config_dir() {
            let dir = config_dir.join("protoscript").join("commands");
            if let Ok(entries) = std::fs::read_dir(&dir) {
                let mut found: Vec<PathBuf> = entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
                    .collect();
                found.sort();
                command_files.extend(found);
            }
        }

        Ok(Config {
            command_files,
            log_level: args.log_level.clone(),
        })
    }

    /// Build the command registry: embedded core table plus extensions.
    /// A broken extension file is logged and skipped, never fatal.
    pub fn build_registry(&self) -> CommandRegistry {
        let mut registry = CommandRegistry::with_builtin_commands();
        for path in &self.command_files {
            if let Err(e) = registry.add_commands_from_file(path) {
                log::warn!("skipping command table {}: {e:#}", path.display());
            }
        }
        registry
    }
}
