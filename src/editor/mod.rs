//! The left-pane text editor.
//!
//! A rope-backed buffer with cursor management; the single source of truth
//! for all three preview surfaces.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
