//! End-to-end properties of the engine pipeline: merge, validate,
//! transform, with determinism under a fixed seed.

use protoscript::parser::{merge_lines, split_statement};
use protoscript::registry::CommandRegistry;
use protoscript::transform::transform_document;
use protoscript::validation::validate_document;

fn registry() -> CommandRegistry {
    CommandRegistry::with_builtin_commands()
}

#[test]
fn bracket_safety() {
    let segments = split_statement("SCALE;Header;Intro;[One;Two];Resp1;Resp2");
    assert_eq!(
        segments,
        vec!["SCALE", "Header", "Intro", "[One;Two]", "Resp1", "Resp2"]
    );
}

#[test]
fn hand_wrapped_statement_merges_into_one_logical_line() {
    let text = "INPUTFIELD;\nHeader Text;\nBody line;\n[A;B;C];\nContinue";
    let merged = merge_lines(text, &registry());
    assert_eq!(
        merged,
        vec!["INPUTFIELD;Header Text;Body line;[A;B;C];Continue"]
    );
}

#[test]
fn expansion_preserves_item_order_for_plain_scale() {
    let expanded = transform_document("SCALE;Hdr;Intro;[One;Two;Three];Resp1;Resp2", 1, &registry());
    assert_eq!(
        expanded,
        vec![
            "SCALE;Hdr;Intro;One;Resp1;Resp2",
            "SCALE;Hdr;Intro;Two;Resp1;Resp2",
            "SCALE;Hdr;Intro;Three;Resp1;Resp2",
        ]
    );
}

#[test]
fn transform_is_deterministic_under_a_fixed_seed() {
    let text = "STUDY_ID;S1\nRANDOMIZE_ON\nSCALE;A;i;one;R\nSCALE;B;i;two;R\nSCALE;C;i;three;R\nSCALE;D;i;four;R\nRANDOMIZE_OFF";
    let first = transform_document(text, 99, &registry());
    let second = transform_document(text, 99, &registry());
    assert_eq!(first, second);
}

#[test]
fn different_seeds_preserve_the_line_multiset() {
    let text = "RANDOMIZE_ON\nSCALE;A;i;one;R\nSCALE;B;i;two;R\nSCALE;C;i;three;R\nSCALE;D;i;four;R\nSCALE;E;i;five;R\nRANDOMIZE_OFF";
    let mut a = transform_document(text, 1, &registry());
    let mut b = transform_document(text, 2, &registry());
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn label_invariants_hold_across_the_document() {
    let text = "LABEL;start\nGOTO;start\nGOTO;missing\nLABEL;start";
    let diagnostics = validate_document(text, &registry());

    let bad_goto: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.error.contains("no matching LABEL"))
        .collect();
    assert_eq!(bad_goto.len(), 1);
    assert_eq!(bad_goto[0].line_number, 3);

    let dup_labels: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.error.contains("duplicate label 'start'"))
        .collect();
    assert_eq!(dup_labels.len(), 2);
}

#[test]
fn randomization_balance_diagnostics() {
    let open_only = validate_document("RANDOMIZE_ON", &registry());
    assert!(open_only.last().unwrap().error.contains("not closed"));
    assert_eq!(open_only.last().unwrap().raw, "<EOF>");

    let close_only = validate_document("RANDOMIZE_OFF", &registry());
    assert_eq!(close_only.len(), 1);
    assert!(close_only[0].error.contains("without matching"));
}

#[test]
fn timer_examples() {
    let warn = validate_document("TIMER;H;B;5000;GO", &registry());
    assert!(warn[0].error.is_empty());
    assert!(warn[0].warning.contains("3600"));

    let err = validate_document("TIMER;H;B;-5;Go", &registry());
    assert!(err[0].error.contains("4th segment"));
}

#[test]
fn one_bad_line_never_hides_the_rest() {
    let text = "TELEPORT;now\nGOTO;nowhere\nTIMER;H;B;10;Go";
    let diagnostics = validate_document(text, &registry());
    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics[0].has_error());
    assert!(diagnostics[1].has_error());
    assert!(diagnostics[2].is_clean());
}

#[test]
fn full_study_script_round_trip() {
    let text = "\
STUDY_ID;PILOT-7
// warm-up
INSTRUCTION;Welcome;Please read carefully;Continue
RANDOMIZE_ON
MULTISCALE;Mood;Rate each item;[Calm;Tense;Alert];Not at all;Very much
TIMER;Break;Sit quietly;30;Go
RANDOMIZE_OFF
LABEL;end
GOTO;end";

    let diagnostics = validate_document(text, &registry());
    assert!(diagnostics.iter().all(|d| !d.has_error()));

    let expanded = transform_document(text, 4, &registry());
    // Markers removed, MULTISCALE expanded to three SCALE lines.
    assert!(!expanded.iter().any(|l| l.contains("RANDOMIZE")));
    assert_eq!(expanded.iter().filter(|l| l.starts_with("SCALE;")).count(), 3);
    assert!(expanded.iter().any(|l| l == "SCALE;Mood;Rate each item;Tense;Not at all;Very much"));
}
