//! Quick-fix behavior over whole documents: idempotence of every repair
//! and composition inside the aggregate safe pass.

use protoscript::fixes::{
    apply_safe_fixes, insert_missing_labels, normalize_colors, normalize_content,
    normalize_timers, remove_duplicate_labels, remove_duplicate_study_id,
    remove_stray_semicolons,
};
use protoscript::registry::CommandRegistry;
use protoscript::validation::validate_document;

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

fn registry() -> CommandRegistry {
    CommandRegistry::with_builtin_commands()
}

#[test]
fn every_fix_is_idempotent() {
    let messy = owned(&[
        "STUDY_ID;a",
        "STUDY_ID;b",
        "GOTO;end;",
        "LABEL;x",
        "LABEL;x",
        "TIMER;;-4;",
        "HEADER_COLOR;#abc",
        "INSTRUCTION;Hi",
        "GOTO;nowhere",
    ]);
    let reg = registry();

    let once = remove_stray_semicolons(&messy);
    assert_eq!(remove_stray_semicolons(&once.lines).changed, 0);

    let once = remove_duplicate_study_id(&messy);
    assert_eq!(remove_duplicate_study_id(&once.lines).changed, 0);

    let once = remove_duplicate_labels(&messy);
    assert_eq!(remove_duplicate_labels(&once.lines).changed, 0);

    let once = insert_missing_labels(&messy);
    assert_eq!(insert_missing_labels(&once.lines).changed, 0);

    let once = normalize_timers(&messy);
    assert_eq!(normalize_timers(&once.lines).changed, 0);

    let once = normalize_colors(&messy, &reg);
    assert_eq!(normalize_colors(&once.lines, &reg).changed, 0);

    let once = normalize_content(&messy);
    assert_eq!(normalize_content(&once.lines).changed, 0);
}

#[test]
fn aggregate_pass_is_idempotent() {
    let messy = owned(&[
        "GOTO;end;",
        "LABEL;x",
        "LABEL;x",
        "TIMER;Rest",
        "BODY_COLOR;white",
        "INSTRUCTION;Hi",
    ]);
    let reg = registry();
    let first = apply_safe_fixes(&messy, &reg);
    assert!(first.total_changes > 0);
    let second = apply_safe_fixes(&first.lines, &reg);
    assert_eq!(second.total_changes, 0);
    assert_eq!(second.lines, first.lines);
}

#[test]
fn aggregate_pass_produces_a_clean_document() {
    let messy = owned(&[
        "STUDY_ID;S1",
        "GOTO;end;",
        "LABEL;x",
        "LABEL;x",
        "TIMER;Rest",
        "BODY_COLOR;white",
        "INSTRUCTION;Hi",
    ]);
    let reg = registry();
    let report = apply_safe_fixes(&messy, &reg);
    let text = report.lines.join("\n");
    let diagnostics = validate_document(&text, &reg);
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.has_error()).collect();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn breakdown_names_every_pass() {
    let report = apply_safe_fixes(&owned(&["LABEL;a"]), &registry());
    for name in [
        "stray_semicolons",
        "colors",
        "timers",
        "content",
        "duplicate_labels",
        "missing_labels",
    ] {
        assert!(report.breakdown.contains_key(name), "missing pass {name}");
    }
    assert_eq!(report.total_changes, 0);
}

#[test]
fn later_fixes_operate_on_earlier_output() {
    // The stray semicolon is stripped first, then the timer is repaired
    // from the stripped text; the label duplicated by hand is removed and
    // the GOTO gains a synthesized label after all content repairs.
    let messy = owned(&["TIMER;Rest;;-1;Go;", "GOTO;calib"]);
    let report = apply_safe_fixes(&messy, &registry());
    assert_eq!(
        report.lines,
        vec!["TIMER;Rest;Body;60;Go", "GOTO;calib", "LABEL;calib"]
    );
}
