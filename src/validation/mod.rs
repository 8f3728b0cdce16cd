//! Validation engine
//!
//! Per-line diagnostics over merged script lines.

pub mod engine;

pub use engine::{build_label_table, validate_document, Diagnostic, LabelTable};
