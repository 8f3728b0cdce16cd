//! Command registry
//!
//! Static metadata about the protocol command set: names, categories and
//! argument shapes, loaded from an embedded TOML table.

pub mod schema;
pub mod table;

pub use schema::{ArgumentKind, Category, CommandSpec, CommandTableFile};
pub use table::CommandRegistry;
