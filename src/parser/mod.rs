//! Protocol script parsing
//!
//! Tokenization (bracket-aware segment splitting), the statement model and
//! the continuation-line merger. Purely textual, no validation here.

pub mod merger;
pub mod statement;
pub mod tokenizer;

pub use merger::{merge_lines, merge_numbered};
pub use statement::{leading_command, RawLine, Statement};
pub use tokenizer::{segment_count, split_statement};
