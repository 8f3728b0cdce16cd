//! Aggregate safe auto-fix
//!
//! Composes the individually safe repairs into one pass. The order is part
//! of the contract: later fixes operate on the output of earlier ones, so a
//! repaired TIMER line can still have its stray semicolon stripped only if
//! one survives the repair.

use super::repairs::{
    insert_missing_labels, normalize_colors, normalize_content, normalize_timers,
    remove_duplicate_labels, remove_stray_semicolons, FixOutcome,
};
use crate::registry::CommandRegistry;
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of the aggregate pass: repaired lines, total change count and a
/// per-fix breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixReport {
    pub lines: Vec<String>,
    pub total_changes: usize,
    pub breakdown: BTreeMap<String, usize>,
}

/// Apply, in order: stray-semicolon, color, timer, content,
/// duplicate-label and missing-label repairs.
///
/// Duplicate-STUDY_ID removal is deliberately not part of this pass; it
/// discards author text and stays an explicit, individual action.
pub fn apply_safe_fixes(lines: &[String], registry: &CommandRegistry) -> FixReport {
    let mut report = FixReport {
        lines: lines.to_vec(),
        total_changes: 0,
        breakdown: BTreeMap::new(),
    };

    let outcome = remove_stray_semicolons(&report.lines);
    record(&mut report, "stray_semicolons", outcome);
    let outcome = normalize_colors(&report.lines, registry);
    record(&mut report, "colors", outcome);
    let outcome = normalize_timers(&report.lines);
    record(&mut report, "timers", outcome);
    let outcome = normalize_content(&report.lines);
    record(&mut report, "content", outcome);
    let outcome = remove_duplicate_labels(&report.lines);
    record(&mut report, "duplicate_labels", outcome);
    let outcome = insert_missing_labels(&report.lines);
    record(&mut report, "missing_labels", outcome);

    report
}

fn record(report: &mut FixReport, name: &str, outcome: FixOutcome) {
    log::debug!("fix pass {name}: {} change(s)", outcome.changed);
    report.total_changes += outcome.changed;
    report.breakdown.insert(name.to_string(), outcome.changed);
    report.lines = outcome.lines;
}
