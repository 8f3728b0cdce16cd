//! Block transformation
//!
//! Turns merged script lines into the flat statement sequence the runner
//! executes: randomization blocks shuffled, multi-item scales expanded.

pub mod blocks;

pub use blocks::{expand_multiscale, transform_document, transform_lines};
