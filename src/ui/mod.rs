//! Terminal UI components.
//!
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Theming and colors
//! - `render`: Pane layout, the editor pane, and frame composition
//! - `preview` / `table`: The three preview surfaces

pub mod style;
pub mod viewport;

mod preview;
mod render;
mod status;
mod table;

pub use render::{preview_content_width, split_panes, view};

pub const PREVIEW_LEFT_PADDING: u16 = 1;
pub const EDITOR_GUTTER_GAP: usize = 1;
