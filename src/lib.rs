//! Protocol Script Engine
//!
//! The pure pipeline behind scripted behavioral-study protocols: a
//! line-oriented, semicolon-delimited script of slides (instructions,
//! timers, rating scales, input fields, labels and styling directives) is
//! turned into a validated, renderable instruction stream plus a list of
//! diagnostics and safe auto-fixes.
//!
//! This crate provides:
//! - Bracket-aware tokenization and continuation-line merging
//! - Randomization-block resolution and multi-item scale expansion,
//!   deterministic under a caller-supplied seed
//! - A registry-driven validator/linter
//! - Idempotent quick-fix repairs and an aggregate safe auto-fix pass

pub mod config;
pub mod fixes;
pub mod parser;
pub mod registry;
pub mod transform;
pub mod validation;

// Re-exports for a clean public API
pub use config::Config;
pub use fixes::{apply_safe_fixes, FixOutcome, FixReport};
pub use parser::{merge_lines, split_statement, RawLine, Statement};
pub use registry::{ArgumentKind, Category, CommandRegistry, CommandSpec};
pub use transform::{transform_document, transform_lines};
pub use validation::{validate_document, Diagnostic};
