//! Text editing primitives for the editor pane.
//!
//! A rope-backed buffer for the Markdown source and a single-line field for
//! the title and author inputs.

mod buffer;
mod field;

pub use buffer::{Cursor, Direction, SourceBuffer};
pub use field::LineField;
