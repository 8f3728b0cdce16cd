//! Block transformer
//!
//! Resolves RANDOMIZE_ON / RANDOMIZE_OFF spans and multi-item scale
//! expansion into a flat, ordered statement sequence for the runner.
//! The random source is always an explicit parameter so a fixed seed
//! reproduces the exact study ordering.

use crate::parser::{leading_command, merge_lines};
use crate::registry::CommandRegistry;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Merge, then resolve blocks and expansion, under a fixed seed.
pub fn transform_document(text: &str, seed: u64, registry: &CommandRegistry) -> Vec<String> {
    let merged = merge_lines(text, registry);
    let mut rng = StdRng::seed_from_u64(seed);
    transform_lines(&merged, &mut rng)
}

/// Resolve randomization blocks and multi-item expansion over merged lines.
///
/// Unbalanced blocks never fail here: an open block at end of input is
/// flushed exactly as RANDOMIZE_OFF would flush it. The validator owns
/// reporting that condition to the author.
pub fn transform_lines<R: Rng>(lines: &[String], rng: &mut R) -> Vec<String> {
    let mut output = Vec::new();
    let mut in_random = false;
    let mut buffer: Vec<String> = Vec::new();

    for line in lines {
        let marker = line.trim();
        if marker.eq_ignore_ascii_case("RANDOMIZE_ON") {
            in_random = true;
            continue;
        }
        if marker.eq_ignore_ascii_case("RANDOMIZE_OFF") {
            in_random = false;
            flush_block(&mut buffer, rng, &mut output);
            continue;
        }
        if in_random {
            buffer.push(line.clone());
        } else {
            output.extend(expand_multiscale(line, rng));
        }
    }

    if in_random && !buffer.is_empty() {
        flush_block(&mut buffer, rng, &mut output);
    }

    output
}

fn flush_block<R: Rng>(buffer: &mut Vec<String>, rng: &mut R, output: &mut Vec<String>) {
    buffer.shuffle(rng);
    for line in buffer.drain(..) {
        output.extend(expand_multiscale(&line, rng));
    }
}

const EXPANDABLE: [&str; 4] = [
    "MULTISCALE",
    "RANDOMIZED_MULTISCALE",
    "SCALE",
    "SCALE[RANDOMIZED]",
];

/// Rewrite one bracketed multi-item line into per-item SCALE lines.
///
/// `PREFIX;[a;b;c];RESPONSES` becomes one `SCALE;{header};{intro};{item};
/// {responses}` line per item. The randomized variants shuffle the emitted
/// lines; everything else passes through unchanged.
pub fn expand_multiscale<R: Rng>(line: &str, rng: &mut R) -> Vec<String> {
    let trimmed = line.trim();
    let command = leading_command(trimmed);
    if !EXPANDABLE.contains(&command.as_str()) {
        return vec![line.to_string()];
    }

    // The bracket span lives after the command token; SCALE[RANDOMIZED]
    // carries brackets in its own name.
    let body_start = match trimmed.find(';') {
        Some(idx) => idx,
        None => return vec![line.to_string()],
    };
    let open = match trimmed[body_start..].find('[') {
        Some(idx) => body_start + idx,
        None => return vec![line.to_string()],
    };
    let close = match trimmed[open..].find(']') {
        Some(idx) => open + idx,
        None => return vec![line.to_string()],
    };

    let prefix: Vec<&str> = trimmed[..open].split(';').collect();
    let header = prefix.get(1).map(|s| s.trim()).unwrap_or("");
    let intro = prefix.get(2).map(|s| s.trim()).unwrap_or("");

    let items: Vec<&str> = trimmed[open + 1..close]
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    // The split right after `]` produces a leading empty segment; drop it.
    let responses: Vec<&str> = trimmed[close + 1..]
        .split(';')
        .map(str::trim)
        .skip_while(|s| s.is_empty())
        .collect();

    let mut expanded: Vec<String> = items
        .iter()
        .map(|item| {
            if responses.is_empty() {
                format!("SCALE;{header};{intro};{item}")
            } else {
                format!("SCALE;{header};{intro};{item};{}", responses.join(";"))
            }
        })
        .collect();

    if command == "RANDOMIZED_MULTISCALE" || command == "SCALE[RANDOMIZED]" {
        expanded.shuffle(rng);
    }

    expanded
}
