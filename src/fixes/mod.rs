//! Quick-fix engine
//!
//! Composable, idempotent text repairs plus the aggregate safe auto-fix
//! pass consumed by an editor's auto-repair action.

pub mod aggregate;
pub mod repairs;

pub use aggregate::{apply_safe_fixes, FixReport};
pub use repairs::{
    insert_missing_labels, normalize_colors, normalize_content, normalize_timers,
    remove_duplicate_labels, remove_duplicate_study_id, remove_stray_semicolons, FixOutcome,
};
